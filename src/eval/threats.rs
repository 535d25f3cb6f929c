//! Threats: pawn attacks on minor/major pieces, minor-piece attacks on
//! major pieces.

use crate::geometry::{self, KNIGHT_MOVE_MASK};
use crate::magic;
use crate::position::Position;
use crate::types::{Color, Piece, PieceKind};

const PAWN_ATTACKS_MINOR: i32 = 35;
const PAWN_ATTACKS_MAJOR: i32 = 50;
const MINOR_ATTACKS_MAJOR: i32 = 22;

/// (mg, eg) threat bonus for `color`'s pieces hanging material over the
/// opponent's minors/majors. Symmetric in mg/eg since these are material
/// threats rather than positional trends.
#[must_use]
pub fn evaluate(pos: &Position, color: Color) -> (i32, i32) {
    let them = color.opposite();
    let enemy_minors =
        pos.piece_bitboards[Piece::of(PieceKind::Knight, them).index()] | pos.piece_bitboards[Piece::of(PieceKind::Bishop, them).index()];
    let enemy_majors =
        pos.piece_bitboards[Piece::of(PieceKind::Rook, them).index()] | pos.piece_bitboards[Piece::of(PieceKind::Queen, them).index()];

    let mut score = 0;

    let own_pawns = pos.piece_bitboards[Piece::of(PieceKind::Pawn, color).index()];
    for from in own_pawns.iter() {
        let attacks = geometry::PAWN_ATTACK_MASK[color.index()][from.as_index()];
        score += (attacks & enemy_minors).popcount() as i32 * PAWN_ATTACKS_MINOR;
        score += (attacks & enemy_majors).popcount() as i32 * PAWN_ATTACKS_MAJOR;
    }

    for kind in [PieceKind::Knight, PieceKind::Bishop] {
        let piece = Piece::of(kind, color);
        for from in pos.piece_bitboards[piece.index()].iter() {
            let attacks = match kind {
                PieceKind::Knight => KNIGHT_MOVE_MASK[from.as_index()],
                PieceKind::Bishop => magic::bishop_attacks(from, pos.occupancy),
                _ => unreachable!(),
            };
            score += (attacks & enemy_majors).popcount() as i32 * MINOR_ATTACKS_MAJOR;
        }
    }

    (score, score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pawn_forking_a_rook_scores_a_threat_bonus() {
        let pos = Position::from_fen("4k3/8/8/8/3r4/4P3/8/4K3 w - - 0 1").unwrap();
        let (mg, _) = evaluate(&pos, Color::White);
        assert_eq!(mg, PAWN_ATTACKS_MAJOR);
    }

    #[test]
    fn quiet_position_has_no_threats() {
        let pos = Position::startpos();
        let (mg, _) = evaluate(&pos, Color::White);
        assert_eq!(mg, 0);
    }
}
