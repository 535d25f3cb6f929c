//! Piece mobility: destination-square counts looked up in per-piece bonus
//! tables normalized so the bonus at average mobility is zero.

use crate::bitboard::Bitboard;
use crate::geometry::KNIGHT_MOVE_MASK;
use crate::magic;
use crate::position::Position;
use crate::types::{Piece, PieceKind};

const KNIGHT_MOB_MG: [i32; 9] = [-28, -14, -2, 4, 8, 12, 17, 21, 25];
const KNIGHT_MOB_EG: [i32; 9] = [-28, -18, -8, 0, 6, 10, 14, 18, 22];
const BISHOP_MOB_MG: [i32; 14] = [-30, -18, -8, 0, 6, 12, 17, 21, 24, 27, 29, 31, 33, 35];
const BISHOP_MOB_EG: [i32; 14] = [-30, -18, -8, 0, 6, 10, 14, 17, 20, 22, 24, 26, 28, 30];
const ROOK_MOB_MG: [i32; 15] = [-14, -8, -3, 0, 3, 6, 9, 12, 14, 16, 18, 20, 21, 22, 23];
const ROOK_MOB_EG: [i32; 15] = [-28, -16, -8, 0, 6, 12, 17, 21, 25, 28, 31, 34, 36, 38, 40];
const QUEEN_MOB_MG: [i32; 28] = [
    -14, -10, -6, -3, 0, 2, 4, 6, 8, 10, 11, 12, 13, 14, 15, 16, 16, 17, 17, 18, 18, 19, 19, 20, 20, 20, 21, 21,
];
const QUEEN_MOB_EG: [i32; 28] = [
    -28, -18, -10, -4, 0, 4, 8, 11, 14, 17, 19, 21, 23, 25, 26, 27, 28, 29, 30, 31, 32, 32, 33, 33, 34, 34, 35, 35,
];

fn attack_set(pos: &Position, kind: PieceKind, from: crate::types::Square) -> Bitboard {
    match kind {
        PieceKind::Knight => KNIGHT_MOVE_MASK[from.as_index()],
        PieceKind::Bishop => magic::bishop_attacks(from, pos.occupancy),
        PieceKind::Rook => magic::rook_attacks(from, pos.occupancy),
        PieceKind::Queen => magic::queen_attacks(from, pos.occupancy),
        _ => unreachable!("mobility is only scored for knight/bishop/rook/queen"),
    }
}

/// (mg, eg) mobility score for one color.
#[must_use]
pub fn evaluate(pos: &Position, color: crate::types::Color) -> (i32, i32) {
    let own_occupancy = pos.color_occupancy[color.index()];
    let mut mg = 0;
    let mut eg = 0;

    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        let piece = Piece::of(kind, color);
        for from in pos.piece_bitboards[piece.index()].iter() {
            let count = (attack_set(pos, kind, from) & !own_occupancy).popcount() as usize;
            let (table_mg, table_eg): (&[i32], &[i32]) = match kind {
                PieceKind::Knight => (&KNIGHT_MOB_MG, &KNIGHT_MOB_EG),
                PieceKind::Bishop => (&BISHOP_MOB_MG, &BISHOP_MOB_EG),
                PieceKind::Rook => (&ROOK_MOB_MG, &ROOK_MOB_EG),
                PieceKind::Queen => (&QUEEN_MOB_MG, &QUEEN_MOB_EG),
                _ => unreachable!(),
            };
            let idx = count.min(table_mg.len() - 1);
            mg += table_mg[idx];
            eg += table_eg[idx];
        }
    }

    (mg, eg)
}
