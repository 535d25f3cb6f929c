//! Static position evaluation: tapered middlegame/endgame scoring with a
//! short-circuit for recognized simple endgames.

mod endgame;
mod king_safety;
mod material;
mod minor_pieces;
mod mobility;
mod passed_pawns;
mod pawns;
mod threats;

use crate::position::Position;
use crate::types::{Color, Piece, PieceKind};

/// Default tempo bonus, mirrored by `Config::default().tempo_bonus` — the
/// UCI-tunable value callers normally pass to `static_score`.
pub const DEFAULT_TEMPO_BONUS: i32 = 12;

/// `eg_scale` for a position whose phase is still closer to the middlegame
/// than the endgame: the full endgame term applies, unscaled.
const NO_DRAW_SCALING: i32 = 128;

#[derive(Debug, Clone, Copy, Default)]
struct EvalScore {
    mg: i32,
    eg: i32,
}

impl std::ops::AddAssign<(i32, i32)> for EvalScore {
    fn add_assign(&mut self, (mg, eg): (i32, i32)) {
        self.mg += mg;
        self.eg += eg;
    }
}

impl std::ops::Sub for EvalScore {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        EvalScore { mg: self.mg - other.mg, eg: self.eg - other.eg }
    }
}

fn accumulate(pos: &Position, color: Color) -> EvalScore {
    let mut score = EvalScore::default();

    for kind in [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        let piece = Piece::of(kind, color);
        for sq in pos.piece_bitboards[piece.index()].iter() {
            score += material::piece_square_value(kind, color, sq);
        }
    }

    let own_pawns = pos.piece_bitboards[Piece::of(PieceKind::Pawn, color).index()];
    score += pawns::evaluate(own_pawns);
    score += passed_pawns::evaluate(pos, color);
    score += mobility::evaluate(pos, color);
    score += king_safety::evaluate(pos, color);
    score += minor_pieces::evaluate(pos, color);
    score += threats::evaluate(pos, color);

    score
}

/// Game phase in `[0, material::MIDDLEGAME_PHASE]`, 0 = bare kings, max =
/// every minor/major on the board.
fn game_phase(pos: &Position) -> i32 {
    let mut phase = 0;
    for color in [Color::White, Color::Black] {
        for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
            let count = pos.piece_bitboards[Piece::of(kind, color).index()].popcount() as i32;
            phase += count * material::PHASE_WEIGHTS[kind.index()];
        }
    }
    phase.min(material::MIDDLEGAME_PHASE)
}

fn taper(mg: i32, eg: i32, phase: i32, eg_scale: i32) -> i32 {
    let scaled_eg = eg * eg_scale / 128;
    (mg * phase + scaled_eg * (material::MIDDLEGAME_PHASE - phase)) / material::MIDDLEGAME_PHASE
}

/// Full positional evaluation of `pos` from the side-to-move's perspective,
/// and whether a recognized drawn/near-forced simple endgame short-circuited
/// the general evaluator. `tempo_bonus` is the UCI-tunable bonus for having
/// the move (`Config::tempo_bonus`).
#[must_use]
pub fn static_score(pos: &Position, tempo_bonus: i32) -> (i32, bool) {
    if let Some(score) = endgame::detect(pos) {
        return (score, true);
    }

    let white = accumulate(pos, Color::White);
    let black = accumulate(pos, Color::Black);
    let diff = white - black;

    let phase = game_phase(pos);

    // Once past the midpoint of the phase range, damp the endgame term for
    // drawish material imbalances `endgame::detect` doesn't already resolve
    // outright (a continuum of near-draws, not just the exact patterns
    // above).
    let eg_scale = if phase < material::MIDDLEGAME_PHASE / 2 {
        let strong = if diff.mg + diff.eg >= 0 { Color::White } else { Color::Black };
        endgame::eg_scale(pos, strong)
    } else {
        NO_DRAW_SCALING
    };
    let mut score = taper(diff.mg, diff.eg, phase, eg_scale);

    score += tempo_bonus;
    if pos.color_to_move == Color::Black {
        score = -score;
    }

    (score, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_roughly_balanced() {
        let pos = Position::startpos();
        let (score, is_endgame) = static_score(&pos, DEFAULT_TEMPO_BONUS);
        assert!(!is_endgame);
        assert!(score.abs() < 50, "startpos score should be near zero, got {score}");
    }

    #[test]
    fn extra_queen_is_a_large_advantage() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let (score, _) = static_score(&pos, DEFAULT_TEMPO_BONUS);
        assert!(score > 800);
    }

    #[test]
    fn side_to_move_perspective_flips_with_color() {
        let white_to_move = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let black_to_move = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        let (white_score, _) = static_score(&white_to_move, DEFAULT_TEMPO_BONUS);
        let (black_score, _) = static_score(&black_to_move, DEFAULT_TEMPO_BONUS);
        assert_eq!(white_score, -black_score);
    }

    #[test]
    fn drawish_rook_vs_minor_endgame_is_damped_toward_zero() {
        let pos = Position::from_fen("4k3/8/8/4n3/8/8/8/4KR2 w - - 0 1").unwrap();
        let (score, is_endgame) = static_score(&pos, DEFAULT_TEMPO_BONUS);
        assert!(!is_endgame);
        assert!(score.abs() < 150, "R vs minor should be damped toward a draw, got {score}");
    }
}
