//! Ties the position, transposition cache, and search worker together
//! behind the handful of operations the UCI layer drives: `position`,
//! `go`, `stop`, `isready`, `setoption`, `ucinewgame`.
//!
//! `go` runs the search on a background thread so the UCI command loop
//! stays free to read `stop`/`quit` off stdin while a search is in
//! flight — the position stack and transposition table are locked for the
//! duration, matching the single-worker ownership the search already
//! assumes.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{ConfigError, MoveParseError};
use crate::movegen;
use crate::moves::Move;
use crate::position::{Position, PositionStack};
use crate::search::{Search, SearchInfo, SearchLimits};
use crate::sync::StopFlag;
use crate::time::{TimeConfig, TimeControl};
use crate::timer::spawn_deadline_timer;
use crate::tt::TranspositionTable;

/// Everything `go` needs, already parsed out of the UCI command tokens.
#[derive(Debug, Clone, Default)]
pub struct GoRequest {
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u64>,
    pub infinite: bool,
}

/// Resolves a long-algebraic move string against the legal moves in `pos`,
/// since the packed `Move` encoding carries flags `parse_identity` can't
/// recover on its own (captured piece, en-passant, castling, ...).
pub fn resolve_move(pos: &Position, text: &str) -> Result<Move, MoveParseError> {
    let (from, to, promo) = Move::parse_identity(text)?;
    let legal = movegen::legal_moves(pos);
    legal
        .as_slice()
        .iter()
        .copied()
        .find(|mv| mv.from() == from && mv.to() == to && mv.promoted().kind() == promo.unwrap_or(crate::types::PieceKind::None))
        .ok_or(MoveParseError::IllegalMove { notation: text.to_string() })
}

struct SearchJob {
    stop: StopFlag,
    handle: JoinHandle<()>,
}

pub struct Engine {
    stack: Arc<Mutex<PositionStack>>,
    tt: Arc<Mutex<TranspositionTable>>,
    config: Config,
    job: Option<SearchJob>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        let config = Config::default();
        Engine {
            stack: Arc::new(Mutex::new(PositionStack::new(Position::startpos()))),
            tt: Arc::new(Mutex::new(TranspositionTable::new(config.hash_size_mb as usize))),
            config,
            job: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        self.config.set_option(name, value)?;
        let normalized = name.trim().to_ascii_lowercase();
        if normalized == "clear hash" {
            self.tt.lock().clear();
        } else if normalized == "hashsizemb" || normalized == "hash" {
            *self.tt.lock() = TranspositionTable::new(self.config.hash_size_mb as usize);
        }
        Ok(())
    }

    /// Resets the transposition cache and move-ordering heuristics for a
    /// new game, per the UCI `ucinewgame` contract.
    pub fn new_game(&mut self) {
        self.wait_for_search();
        self.tt.lock().clear();
        *self.stack.lock() = PositionStack::new(Position::startpos());
    }

    /// Sets the root position (`startpos` or a FEN) and replays `moves`
    /// (already-validated `Move`s — callers use `resolve_move` to parse
    /// each UCI move string against the position it applies to).
    pub fn set_position(&mut self, root: Position, moves: &[Move]) {
        self.wait_for_search();
        let mut stack = PositionStack::new(root);
        for &mv in moves {
            stack.play_move(mv);
        }
        *self.stack.lock() = stack;
    }

    #[must_use]
    pub fn current_position(&self) -> Position {
        *self.stack.lock().current()
    }

    fn wait_for_search(&mut self) {
        if let Some(job) = self.job.take() {
            job.stop.stop();
            let _ = job.handle.join();
        }
    }

    /// Signals the in-flight search (if any) to stop at its next node-count
    /// check; does not block.
    pub fn stop(&self) {
        if let Some(job) = &self.job {
            job.stop.stop();
        }
    }

    pub fn is_searching(&self) -> bool {
        self.job.is_some()
    }

    /// Starts a search on a background thread. `on_info` is invoked once
    /// per completed iteration, `on_best_move` once at the end; both run on
    /// the search thread.
    pub fn go(
        &mut self,
        request: GoRequest,
        on_info: impl FnMut(&SearchInfo) + Send + 'static,
        on_best_move: impl FnOnce(Option<Move>) + Send + 'static,
    ) {
        self.wait_for_search();

        #[cfg(feature = "logging")]
        log::trace!("go: {request:?}");

        let stop = StopFlag::new();
        let limits = self.build_limits(&request, &stop);

        let stack = Arc::clone(&self.stack);
        let tt = Arc::clone(&self.tt);
        let job_stop = stop.clone();
        let config = self.config.clone();

        let handle = thread::spawn(move || {
            let mut stack = stack.lock();
            let mut tt = tt.lock();
            let mut search = Search::new(&mut tt, job_stop, limits, &config);
            let best = search.iterative_deepening(&mut stack, on_info);
            on_best_move(best);
        });

        self.job = Some(SearchJob { stop, handle });
    }

    fn build_limits(&self, request: &GoRequest, stop: &StopFlag) -> SearchLimits {
        let color_to_move = self.stack.lock().current().color_to_move;
        let time_control = if let Some(ms) = request.movetime_ms {
            TimeControl::move_time(Duration::from_millis(ms))
        } else if request.infinite || (request.wtime_ms.is_none() && request.btime_ms.is_none()) {
            TimeControl::Infinite
        } else {
            let (time_ms, inc_ms) = match color_to_move {
                crate::types::Color::White => (request.wtime_ms.unwrap_or(0), request.winc_ms.unwrap_or(0)),
                crate::types::Color::Black => (request.btime_ms.unwrap_or(0), request.binc_ms.unwrap_or(0)),
            };
            TimeControl::incremental(Duration::from_millis(time_ms), Duration::from_millis(inc_ms), request.movestogo)
        };

        let deadline = if time_control.is_unlimited() {
            None
        } else {
            let (_, hard_ms) = time_control.compute_limits(&TimeConfig::default());
            let deadline = Instant::now() + Duration::from_millis(hard_ms.min(3_600_000));
            spawn_deadline_timer(deadline, stop.clone());
            Some(deadline)
        };

        SearchLimits { max_depth: request.depth.unwrap_or(64), node_limit: request.nodes, deadline }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn go_with_a_depth_limit_reports_bestmove() {
        let mut engine = Engine::new();
        let (tx, rx) = mpsc::channel();
        engine.go(GoRequest { depth: Some(3), ..Default::default() }, |_| {}, move |best| {
            tx.send(best).unwrap();
        });
        let best = rx.recv_timeout(Duration::from_secs(10)).expect("search should finish");
        assert!(best.is_some());
    }

    #[test]
    fn set_position_replays_moves() {
        let mut engine = Engine::new();
        let e2e4 = resolve_move(&engine.current_position(), "e2e4").unwrap();
        engine.set_position(Position::startpos(), &[e2e4]);
        assert_eq!(engine.current_position().color_to_move, crate::types::Color::Black);
    }

    #[test]
    fn stop_halts_an_infinite_search_promptly() {
        let mut engine = Engine::new();
        let (tx, rx) = mpsc::channel();
        engine.go(GoRequest { infinite: true, ..Default::default() }, |_| {}, move |best| {
            tx.send(best).unwrap();
        });
        std::thread::sleep(Duration::from_millis(50));
        engine.stop();
        let best = rx.recv_timeout(Duration::from_secs(5)).expect("stop should terminate the search");
        assert!(best.is_some());
    }
}
