//! Minor-piece terms: the bishop-pair bonus.

use crate::position::Position;
use crate::types::{Color, Piece, PieceKind};

const BISHOP_PAIR_MG: i32 = 18;
const BISHOP_PAIR_EG: i32 = 28;

fn square_is_light(sq: crate::types::Square) -> bool {
    (sq.rank() + sq.file()) % 2 == 1
}

/// (mg, eg) bishop-pair bonus for `color`: awarded iff it holds at least one
/// bishop on each square color.
#[must_use]
pub fn evaluate(pos: &Position, color: Color) -> (i32, i32) {
    let bishops = pos.piece_bitboards[Piece::of(PieceKind::Bishop, color).index()];
    let mut has_light = false;
    let mut has_dark = false;
    for sq in bishops.iter() {
        if square_is_light(sq) {
            has_light = true;
        } else {
            has_dark = true;
        }
    }
    if has_light && has_dark {
        (BISHOP_PAIR_MG, BISHOP_PAIR_EG)
    } else {
        (0, 0)
    }
}
