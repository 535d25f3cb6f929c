//! Iterative deepening negamax search: principal-variation search with
//! null-move pruning, reverse futility pruning, late-move reductions, and a
//! SEE/delta-pruned quiescence search at the leaves.
//!
//! `PositionStack` already holds the game history up to the search root, so
//! recursion plays/undoes moves on that same stack rather than threading a
//! separate history buffer — repetition detection falls out of
//! `PositionStack::is_repetition`.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::eval;
use crate::movegen;
use crate::moves::Move;
use crate::ordering::{self, MoveOrderingTables};
use crate::position::PositionStack;
use crate::see;
use crate::sync::StopFlag;
use crate::tt::{ScorePrecision, TranspositionTable};

pub const MATE_SCORE: i32 = 29000;
pub const MATE_THRESHOLD: i32 = 28000;
pub const SCORE_INFINITE: i32 = 30000;
const MAX_PLY: usize = 128;
const MAX_QSEARCH_PLY: i32 = 12;
const NULL_MOVE_MIN_DEPTH: i32 = 3;
const RFP_MAX_DEPTH: i32 = 8;
const LMR_MIN_DEPTH: i32 = 3;
const LMR_MIN_MOVE_INDEX: usize = 3;
const ASPIRATION_WINDOW: i32 = 35;
const DELTA_MARGIN: i32 = 200;
const NODES_PER_CANCEL_CHECK: u64 = 2048;

/// One completed (or partially searched, for `depth`/`seldepth`) iteration,
/// reported to the UCI layer.
#[derive(Debug, Clone)]
pub struct SearchInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

pub struct SearchLimits {
    pub max_depth: u32,
    pub node_limit: Option<u64>,
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits { max_depth: depth, node_limit: None, deadline: None }
    }
}

/// Late-move-reduction curve, matching the teacher's
/// `(0.53 + ln(depth)*ln(idx)/2.44).floor()` shape.
fn lmr_reduction(depth: i32, move_index: usize) -> i32 {
    if depth < 1 || move_index < 1 {
        return 0;
    }
    let r = 0.53 + (depth as f64).ln() * (move_index as f64).ln() / 2.44;
    r.floor().max(0.0) as i32
}

fn mate_score_from_ply(ply: usize) -> i32 {
    MATE_SCORE - ply as i32
}

/// Search worker: owns the heuristic tables and node/time bookkeeping for
/// the lifetime of one `go` command. The transposition cache outlives the
/// worker and is passed in by mutable reference.
pub struct Search<'a> {
    tt: &'a mut TranspositionTable,
    ordering: MoveOrderingTables,
    stop: StopFlag,
    limits: SearchLimits,
    start: Instant,
    nodes: u64,
    seldepth: u32,
    aborted: bool,
    prev_move: [Move; MAX_PLY + 1],
    rfp_margin: i32,
    null_move_base_reduction: i32,
    tempo_bonus: i32,
}

impl<'a> Search<'a> {
    #[must_use]
    pub fn new(tt: &'a mut TranspositionTable, stop: StopFlag, limits: SearchLimits, config: &Config) -> Self {
        Search {
            tt,
            ordering: MoveOrderingTables::new(MAX_PLY),
            stop,
            limits,
            start: Instant::now(),
            nodes: 0,
            seldepth: 0,
            aborted: false,
            prev_move: [Move::NULL; MAX_PLY + 1],
            rfp_margin: config.rfp_margin,
            null_move_base_reduction: config.null_move_base_reduction,
            tempo_bonus: config.tempo_bonus,
        }
    }

    fn time_is_up(&self) -> bool {
        self.limits.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Polled every `NODES_PER_CANCEL_CHECK` nodes: the one place a search
    /// in progress can discover it should unwind.
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.nodes % NODES_PER_CANCEL_CHECK == 0 && (self.stop.is_stopped() || self.time_is_up()) {
            self.aborted = true;
        }
        if let Some(limit) = self.limits.node_limit {
            if self.nodes >= limit {
                self.aborted = true;
            }
        }
        self.aborted
    }

    /// Iterative deepening from depth 1 to `limits.max_depth` (or until
    /// cancelled), reporting each completed iteration through `on_info`.
    /// Returns the best move from the most recently *completed* iteration;
    /// a cancelled iteration's partial score never overrides it.
    pub fn iterative_deepening(&mut self, stack: &mut PositionStack, mut on_info: impl FnMut(&SearchInfo)) -> Option<Move> {
        self.tt.new_generation();
        let mut best_move = None;
        let mut score = 0;

        let mut depth = 1;
        while depth <= self.limits.max_depth.max(1) as i32 {
            let (alpha, beta) =
                if depth <= 2 { (-SCORE_INFINITE, SCORE_INFINITE) } else { (score - ASPIRATION_WINDOW, score + ASPIRATION_WINDOW) };

            let result = self.aspirate(stack, depth, alpha, beta);
            if self.aborted && best_move.is_some() {
                break;
            }

            score = result;
            let pv = self.extract_pv(stack, depth);
            best_move = pv.first().copied().or(best_move);

            #[cfg(feature = "logging")]
            log::debug!("depth {depth} score {score} nodes {} hashfull {}", self.nodes, self.tt.hashfull_per_mille());

            let elapsed = self.start.elapsed();
            on_info(&SearchInfo {
                depth: depth as u32,
                seldepth: self.seldepth,
                score,
                nodes: self.nodes,
                nps: nps(self.nodes, elapsed),
                time_ms: elapsed.as_millis() as u64,
                hashfull: self.tt.hashfull_per_mille(),
                pv,
            });

            if self.aborted || score.abs() >= MATE_THRESHOLD {
                break;
            }
            depth += 1;
        }

        best_move
    }

    /// Re-searches with a widened window on aspiration failure, grounded on
    /// the teacher's iterative-deepening loop.
    fn aspirate(&mut self, stack: &mut PositionStack, depth: i32, mut alpha: i32, mut beta: i32) -> i32 {
        loop {
            let score = self.alphabeta(stack, depth, alpha, beta, true);
            if self.aborted {
                return score;
            }
            if score <= alpha {
                alpha = (alpha - ASPIRATION_WINDOW * 2).max(-SCORE_INFINITE);
            } else if score >= beta {
                beta = (beta + ASPIRATION_WINDOW * 2).min(SCORE_INFINITE);
            } else {
                return score;
            }
            if alpha <= -SCORE_INFINITE && beta >= SCORE_INFINITE {
                return self.alphabeta(stack, depth, -SCORE_INFINITE, SCORE_INFINITE, true);
            }
        }
    }

    /// Walks hash moves from the root to reconstruct a principal variation
    /// for reporting; does not mutate `stack` past its original ply.
    fn extract_pv(&mut self, stack: &mut PositionStack, max_len: i32) -> Vec<Move> {
        let mut pv = Vec::new();
        let mut played = 0;
        while (played as i32) < max_len.max(1) {
            let Some(probe) = self.tt.probe(stack.current().key) else { break };
            if probe.best_move.is_null() {
                break;
            }
            let legal = movegen::legal_moves(stack.current());
            if !legal.as_slice().contains(&probe.best_move) {
                break;
            }
            pv.push(probe.best_move);
            stack.play_move(probe.best_move);
            played += 1;
        }
        for _ in 0..played {
            stack.undo_move();
        }
        pv
    }

    fn alphabeta(&mut self, stack: &mut PositionStack, depth: i32, mut alpha: i32, beta: i32, is_pv: bool) -> i32 {
        self.nodes += 1;
        let ply = stack.ply();
        self.seldepth = self.seldepth.max(ply as u32);

        if self.should_stop() {
            return 0;
        }

        let pos = *stack.current();

        if ply > 0 {
            if pos.is_fifty_move_draw() || pos.has_insufficient_material() || stack.is_repetition(1) {
                return 0;
            }
            let alpha_bound = alpha.max(-mate_score_from_ply(ply));
            let beta_bound = beta.min(mate_score_from_ply(ply) - 1);
            if alpha_bound >= beta_bound {
                return alpha_bound;
            }
            alpha = alpha_bound;
        }

        if depth <= 0 {
            return self.quiescence(stack, alpha, beta, 0);
        }

        let tt_probe = self.tt.probe(pos.key);
        let mut hash_move = Move::NULL;
        if let Some(probe) = tt_probe {
            hash_move = probe.best_move;
            if !is_pv && i32::from(probe.depth) >= depth {
                let usable = match probe.precision {
                    ScorePrecision::Exact => true,
                    ScorePrecision::LowerBound => probe.score >= beta,
                    ScorePrecision::UpperBound => probe.score <= alpha,
                    ScorePrecision::Unknown => false,
                };
                if usable {
                    return probe.score;
                }
            }
        }

        let in_check = pos.king_in_check;
        let (static_eval, _) = eval::static_score(&pos, self.tempo_bonus);

        if !in_check && !is_pv && depth <= RFP_MAX_DEPTH && static_eval - self.rfp_margin * depth >= beta && beta.abs() < MATE_THRESHOLD {
            return static_eval;
        }

        if !in_check && !is_pv && depth >= NULL_MOVE_MIN_DEPTH && has_non_pawn_material(&pos) && beta.abs() < MATE_THRESHOLD {
            stack.play_null_move();
            let reduction = self.null_move_base_reduction + depth / 4;
            let score = -self.alphabeta(stack, depth - 1 - reduction, -beta, -beta + 1, false);
            stack.undo_null_move();
            if self.aborted {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        let mut moves = movegen::legal_moves(&pos);
        if moves.is_empty() {
            return if in_check { -mate_score_from_ply(ply) } else { 0 };
        }

        let hash_move = if moves.as_slice().contains(&hash_move) { hash_move } else { Move::NULL };
        let prev_move = if ply > 0 { Some(self.prev_move[ply - 1]) } else { None };
        ordering::order_moves(moves.as_mut_slice(), &self.ordering, ply, Some(hash_move).filter(|m| !m.is_null()), prev_move);

        let mut best_score = -SCORE_INFINITE;
        let mut best_move = Move::NULL;
        let original_alpha = alpha;
        let mut tried_quiets: Vec<Move> = Vec::new();

        for (index, &mv) in moves.as_slice().iter().enumerate() {
            self.prev_move[ply] = mv;
            stack.play_move(mv);

            let gives_check = stack.current().king_in_check;
            let mut reduction = 0;
            if depth >= LMR_MIN_DEPTH && index >= LMR_MIN_MOVE_INDEX && !mv.is_capture() && !gives_check && !in_check {
                reduction = lmr_reduction(depth, index).min(depth - 1);
            }

            let score = if index == 0 {
                -self.alphabeta(stack, depth - 1, -beta, -alpha, is_pv)
            } else {
                let reduced = -self.alphabeta(stack, depth - 1 - reduction, -alpha - 1, -alpha, false);
                if reduced > alpha && (reduction > 0 || is_pv) {
                    -self.alphabeta(stack, depth - 1, -beta, -alpha, is_pv)
                } else {
                    reduced
                }
            };

            stack.undo_move();

            if self.aborted {
                return 0;
            }

            if !mv.is_capture() && mv != hash_move {
                tried_quiets.push(mv);
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                if !mv.is_capture() {
                    self.ordering.record_killer(ply, mv);
                    self.ordering.record_cutoff(depth, mv, &tried_quiets, prev_move);
                }
                break;
            }
        }

        let precision = if best_score <= original_alpha {
            ScorePrecision::UpperBound
        } else if best_score >= beta {
            ScorePrecision::LowerBound
        } else {
            ScorePrecision::Exact
        };
        self.tt.store(pos.key, depth.min(i32::from(i8::MAX)) as i8, best_score, precision, best_move);

        best_score
    }

    /// Captures-only search to a quiet position: stand-pat, depth-tiered
    /// delta pruning, and SEE-based pruning of clearly losing captures.
    fn quiescence(&mut self, stack: &mut PositionStack, mut alpha: i32, beta: i32, qdepth: i32) -> i32 {
        self.nodes += 1;
        let ply = stack.ply();
        self.seldepth = self.seldepth.max(ply as u32);

        if self.should_stop() {
            return 0;
        }

        let pos = *stack.current();
        let in_check = pos.king_in_check;
        let (static_eval, _) = eval::static_score(&pos, self.tempo_bonus);

        if !in_check {
            if static_eval >= beta {
                return beta;
            }
            alpha = alpha.max(static_eval);
        }

        if qdepth >= MAX_QSEARCH_PLY {
            return static_eval;
        }

        let mut moves = if in_check { movegen::legal_moves(&pos) } else { captures_only(&pos) };
        if moves.is_empty() {
            return if in_check { -mate_score_from_ply(ply) } else { static_eval };
        }

        ordering::order_moves(moves.as_mut_slice(), &self.ordering, 0, None, None);

        let see_threshold = if qdepth < 4 {
            0
        } else if qdepth < 8 {
            -100
        } else {
            -200
        };
        let mut best = if in_check { -SCORE_INFINITE } else { static_eval };

        for &mv in moves.as_slice() {
            if !in_check {
                if mv.is_capture() && !mv.is_en_passant_capture() {
                    let gain = static_eval + piece_gain_estimate(mv) + DELTA_MARGIN;
                    if gain < alpha {
                        continue;
                    }
                }
                if see::see(&pos, mv) < see_threshold {
                    continue;
                }
            }

            stack.play_move(mv);
            let score = -self.quiescence(stack, -beta, -alpha, qdepth + 1);
            stack.undo_move();

            if self.aborted {
                return 0;
            }

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }
}

fn nps(nodes: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs < 0.001 {
        return nodes;
    }
    (nodes as f64 / secs) as u64
}

fn has_non_pawn_material(pos: &crate::position::Position) -> bool {
    use crate::types::{Color, Piece, PieceKind};
    for color in [Color::White, Color::Black] {
        for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
            if !pos.piece_bitboards[Piece::of(kind, color).index()].is_empty() {
                return true;
            }
        }
    }
    false
}

fn captures_only(pos: &crate::position::Position) -> crate::moves::MoveList {
    let mut work = *pos;
    movegen::generate_all(&mut work);
    let mut out = crate::moves::MoveList::new();
    for idx in 0..work.move_count {
        let mv = work.move_list[idx];
        if (mv.is_capture() || mv.is_promotion()) && work.is_move_legal(mv) {
            let mut stamped = mv;
            stamped.set_check(work.gives_check(mv));
            out.push(stamped);
        }
    }
    out
}

fn piece_gain_estimate(mv: Move) -> i32 {
    use crate::types::PieceKind;
    let kind = if mv.is_en_passant_capture() { PieceKind::Pawn } else { mv.captured().kind() };
    match kind {
        PieceKind::None => 0,
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Position, PositionStack};

    fn search_at(fen: &str, depth: u32) -> (Option<Move>, i32) {
        let pos = Position::from_fen(fen).unwrap();
        let mut stack = PositionStack::new(pos);
        let mut tt = TranspositionTable::new(1);
        let mut search = Search::new(&mut tt, StopFlag::new(), SearchLimits::depth(depth), &Config::default());
        let mut last_score = 0;
        let best = search.iterative_deepening(&mut stack, |info| last_score = info.score);
        (best, last_score)
    }

    #[test]
    fn finds_mate_in_one() {
        let (best, score) = search_at("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", 3);
        let mv = best.expect("mate in one should be found");
        assert_eq!(mv.from(), "a1".parse().unwrap());
        assert_eq!(mv.to(), "a8".parse().unwrap());
        assert!(score >= MATE_THRESHOLD, "expected a mate score, got {score}");
    }

    #[test]
    fn finds_free_queen_capture() {
        let (best, score) = search_at("4k3/8/8/3q4/4Q3/8/8/4K3 w - - 0 1", 4);
        let mv = best.expect("a capturing move should be found");
        assert_eq!(mv.to(), "d5".parse().unwrap());
        assert!(score > 800, "expected a large material advantage, got {score}");
    }

    #[test]
    fn stalemate_scores_as_a_draw() {
        let (_, score) = search_at("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 2);
        assert_eq!(score, 0);
    }

    #[test]
    fn respects_a_shallow_depth_limit() {
        let pos = Position::startpos();
        let mut stack = PositionStack::new(pos);
        let mut tt = TranspositionTable::new(1);
        let mut search = Search::new(&mut tt, StopFlag::new(), SearchLimits::depth(1), &Config::default());
        let mut depths_seen = Vec::new();
        search.iterative_deepening(&mut stack, |info| depths_seen.push(info.depth));
        assert_eq!(depths_seen, vec![1]);
    }
}
