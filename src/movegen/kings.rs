//! King step moves and castling.
//!
//! Castling is suppressed here while the king is in check — the legality
//! pass still re-verifies the transit squares, but generating a castle
//! that's doomed to fail the legality test wastes work the generator can
//! skip cheaply.

use crate::bitboard::Bitboard;
use crate::geometry::{self, KING_MOVE_MASK};
use crate::moves::{Move, MoveSpec};
use crate::position::Position;
use crate::types::{CastlingRights, Piece, PieceKind};

use super::MoveStage;

pub(super) fn generate(pos: &mut Position, stage: MoveStage, from_mask: Bitboard, destination_mask: Bitboard) {
    let us = pos.color_to_move;
    let them = us.opposite();
    let king = Piece::of(PieceKind::King, us);
    let from = pos.king_square(us);
    if !from_mask.contains(from) {
        return;
    }

    let destinations = KING_MOVE_MASK[from.as_index()] & destination_mask;
    for to in destinations.iter() {
        let captured = if pos.color_occupancy[them.index()].contains(to) {
            pos.get_piece(to)
        } else {
            Piece::NONE
        };
        pos.push_generated_move(Move::new(MoveSpec {
            from,
            to,
            piece: king,
            captured,
            is_king_move: true,
            ..Default::default()
        }));
    }

    if stage == MoveStage::OnlyCaptures || pos.king_in_check {
        return;
    }

    for (kingside, right) in [(true, CastlingRights::kingside(us)), (false, CastlingRights::queenside(us))] {
        if !pos.castling.has(right) {
            continue;
        }
        let empty_mask = geometry::CASTLE_EMPTY_SQUARES_MASK[us.index()][if kingside { 0 } else { 1 }];
        if empty_mask.intersects(pos.occupancy) {
            continue;
        }
        let destination = geometry::castle_king_destination(us, kingside);
        if !destination_mask.contains(destination) {
            continue;
        }
        pos.push_generated_move(Move::new(MoveSpec {
            from,
            to: destination,
            piece: king,
            is_castling: true,
            is_king_move: true,
            ..Default::default()
        }));
    }
}
