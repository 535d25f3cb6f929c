//! Knight, bishop, rook and queen move generation.
//!
//! All four share one shape — iterate the piece's squares, look up its
//! attack set against the current occupancy, mask by the stage/to filters —
//! so a single function dispatches over a per-kind attack-lookup function
//! pointer rather than four near-identical loops.

use crate::bitboard::Bitboard;
use crate::geometry::KNIGHT_MOVE_MASK;
use crate::magic;
use crate::moves::{Move, MoveSpec};
use crate::position::Position;
use crate::types::{Piece, PieceKind, Square};

type AttackFn = fn(Square, Bitboard) -> Bitboard;

fn knight_attacks(sq: Square, _occupancy: Bitboard) -> Bitboard {
    KNIGHT_MOVE_MASK[sq.as_index()]
}

fn attack_fn(kind: PieceKind) -> AttackFn {
    match kind {
        PieceKind::Knight => knight_attacks,
        PieceKind::Bishop => magic::bishop_attacks,
        PieceKind::Rook => magic::rook_attacks,
        PieceKind::Queen => magic::queen_attacks,
        _ => unreachable!("sliders::generate only handles knight/bishop/rook/queen"),
    }
}

pub(super) fn generate(pos: &mut Position, kind: PieceKind, from_mask: Bitboard, destination_mask: Bitboard) {
    let us = pos.color_to_move;
    let them = us.opposite();
    let piece = Piece::of(kind, us);
    let attacks = attack_fn(kind);
    let occupancy = pos.occupancy;

    for from in (pos.piece_bitboards[piece.index()] & from_mask).iter() {
        let destinations = attacks(from, occupancy) & destination_mask;
        for to in destinations.iter() {
            let captured = if pos.color_occupancy[them.index()].contains(to) {
                pos.get_piece(to)
            } else {
                Piece::NONE
            };
            pos.push_generated_move(Move::new(MoveSpec {
                from,
                to,
                piece,
                captured,
                ..Default::default()
            }));
        }
    }
}
