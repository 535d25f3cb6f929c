//! Move ordering heuristics: MVV-LVA captures, killer moves, history and
//! counter-move history, all folded into each move's ordering-score field
//! and sorted by a plain integer compare.

use crate::moves::Move;
use crate::types::{PieceKind, Square};

const HASH_MOVE_SCORE: i32 = i32::MAX;
const CAPTURE_BASE: i32 = 2_000_000;
const KILLER_BASE: i32 = 1_000_000;
const HISTORY_MAX: i32 = 16_384;

fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::None => 0,
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

/// MVV-LVA: `(victim_value * 64) - attacker_value`, always positive for any
/// real capture since the smallest attacker (100) never exceeds 64 times the
/// smallest victim (100 * 64 = 6400).
#[must_use]
pub fn mvv_lva_score(victim: PieceKind, attacker: PieceKind) -> i32 {
    piece_value(victim) * 64 - piece_value(attacker)
}

fn history_index(kind: PieceKind, from: Square, to: Square) -> usize {
    debug_assert!(kind != PieceKind::None);
    (kind.index() - 1) * 64 * 64 + from.as_index() * 64 + to.as_index()
}

fn counter_history_index(prev_kind: PieceKind, prev_to: Square, kind: PieceKind, to: Square) -> usize {
    debug_assert!(prev_kind != PieceKind::None && kind != PieceKind::None);
    let prev_idx = (prev_kind.index() - 1) * 64 + prev_to.as_index();
    let cur_idx = (kind.index() - 1) * 64 + to.as_index();
    prev_idx * 6 * 64 + cur_idx
}

fn apply_decaying_bonus(slot: &mut i32, delta: i32) {
    *slot += delta - *slot * delta.abs() / HISTORY_MAX;
}

/// Killer-move slots and history/counter-history score tables, owned by the
/// search worker for the lifetime of one `go` command.
pub struct MoveOrderingTables {
    killers: Vec<[Move; 2]>,
    history: Vec<i32>,
    counter_move_history: Vec<i32>,
}

impl MoveOrderingTables {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        MoveOrderingTables {
            killers: vec![[Move::NULL; 2]; max_depth + 1],
            history: vec![0; 6 * 64 * 64],
            counter_move_history: vec![0; 6 * 64 * 6 * 64],
        }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.killers {
            *slot = [Move::NULL; 2];
        }
        self.history.iter_mut().for_each(|v| *v = 0);
        self.counter_move_history.iter_mut().for_each(|v| *v = 0);
    }

    pub fn record_killer(&mut self, depth: usize, mv: Move) {
        let Some(slot) = self.killers.get_mut(depth) else { return };
        if slot[0] == mv {
            return;
        }
        slot[1] = slot[0];
        slot[0] = mv;
    }

    #[must_use]
    fn is_killer(&self, depth: usize, mv: Move) -> Option<usize> {
        let slot = self.killers.get(depth)?;
        if slot[0] == mv {
            Some(0)
        } else if slot[1] == mv {
            Some(1)
        } else {
            None
        }
    }

    /// Record a beta cutoff: the cutting move gets a positive bonus, every
    /// quiet move tried before it at this node gets an equal negative one.
    pub fn record_cutoff(&mut self, depth: i32, cutting: Move, tried_quiets: &[Move], prev: Option<Move>) {
        let bonus = (depth * depth).min(HISTORY_MAX);
        let kind = cutting.piece().kind();
        apply_decaying_bonus(&mut self.history[history_index(kind, cutting.from(), cutting.to())], bonus);
        if let Some(prev) = prev {
            if !prev.is_null() {
                let idx = counter_history_index(prev.piece().kind(), prev.to(), kind, cutting.to());
                apply_decaying_bonus(&mut self.counter_move_history[idx], bonus);
            }
        }
        for &mv in tried_quiets {
            if mv == cutting {
                continue;
            }
            let kind = mv.piece().kind();
            apply_decaying_bonus(&mut self.history[history_index(kind, mv.from(), mv.to())], -bonus);
            if let Some(prev) = prev {
                if !prev.is_null() {
                    let idx = counter_history_index(prev.piece().kind(), prev.to(), kind, mv.to());
                    apply_decaying_bonus(&mut self.counter_move_history[idx], -bonus);
                }
            }
        }
    }

    fn quiet_score(&self, mv: Move, prev: Option<Move>) -> i32 {
        let kind = mv.piece().kind();
        let mut score = self.history[history_index(kind, mv.from(), mv.to())];
        if let Some(prev) = prev {
            if !prev.is_null() {
                let idx = counter_history_index(prev.piece().kind(), prev.to(), kind, mv.to());
                score += self.counter_move_history[idx];
            }
        }
        score
    }
}

/// Scores every move's ordering field and sorts `moves` highest-first:
/// hash move, then captures by MVV-LVA, then killers, then quiets by
/// history + counter-move history.
pub fn order_moves(moves: &mut [Move], tables: &MoveOrderingTables, depth: usize, hash_move: Option<Move>, prev_move: Option<Move>) {
    for mv in moves.iter_mut() {
        let score = if hash_move == Some(*mv) {
            HASH_MOVE_SCORE
        } else if mv.is_capture() {
            let victim = if mv.is_en_passant_capture() { PieceKind::Pawn } else { mv.captured().kind() };
            CAPTURE_BASE + mvv_lva_score(victim, mv.piece().kind())
        } else if let Some(slot) = tables.is_killer(depth, *mv) {
            KILLER_BASE - slot as i32
        } else {
            tables.quiet_score(*mv, prev_move)
        };
        mv.set_ordering_score(score);
    }
    moves.sort_unstable_by_key(|m| std::cmp::Reverse(m.ordering_score()));
}
