//! Static exchange evaluation: swap-off a capture square and report the
//! net material result if both sides recapture with the least valuable
//! attacker each time.

use crate::bitboard::Bitboard;
use crate::magic;
use crate::moves::Move;
use crate::position::Position;
use crate::types::{Color, Piece, PieceKind, Square};

const VALUES: [i32; 7] = [0, 100, 325, 325, 500, 975, 20000];

fn piece_value(kind: PieceKind) -> i32 {
    VALUES[kind.index()]
}

fn attackers_to_square(sq: Square, occ: Bitboard, pos: &Position, color: Color) -> Bitboard {
    let mut attackers = Bitboard::EMPTY;

    let pawn_sources = crate::geometry::PAWN_ATTACK_MASK[color.opposite().index()][sq.as_index()];
    attackers |= pawn_sources & pos.piece_bitboards[Piece::of(PieceKind::Pawn, color).index()];

    attackers |= crate::geometry::KNIGHT_MOVE_MASK[sq.as_index()] & pos.piece_bitboards[Piece::of(PieceKind::Knight, color).index()];
    attackers |= crate::geometry::KING_MOVE_MASK[sq.as_index()] & pos.piece_bitboards[Piece::of(PieceKind::King, color).index()];

    let bishop_like =
        pos.piece_bitboards[Piece::of(PieceKind::Bishop, color).index()] | pos.piece_bitboards[Piece::of(PieceKind::Queen, color).index()];
    attackers |= bishop_like & magic::bishop_attacks(sq, occ);

    let rook_like =
        pos.piece_bitboards[Piece::of(PieceKind::Rook, color).index()] | pos.piece_bitboards[Piece::of(PieceKind::Queen, color).index()];
    attackers |= rook_like & magic::rook_attacks(sq, occ);

    attackers
}

fn least_valuable_attacker(attackers: Bitboard, pos: &Position, color: Color) -> Option<(Square, PieceKind)> {
    for kind in [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        let bb = attackers & pos.piece_bitboards[Piece::of(kind, color).index()];
        if let Some(sq) = bb.iter().next() {
            return Some((sq, kind));
        }
    }
    None
}

/// Net material gain (centipawns) of playing capture `mv`, after both sides
/// exchange on the destination square with least-valuable-attacker-first.
/// Positive favors the side to move.
#[must_use]
pub fn see(pos: &Position, mv: Move) -> i32 {
    if !mv.is_capture() {
        return 0;
    }

    let to = mv.to();
    let mut occ = pos.occupancy;
    let us = pos.color_to_move;
    let mut side = us.opposite();

    occ.clear(mv.from());
    if mv.is_en_passant_capture() {
        let captured_sq = Square::new(mv.from().rank(), mv.to().file());
        occ.clear(captured_sq);
    } else {
        occ.clear(to);
    }
    occ.set(to);

    let captured_kind = if mv.is_en_passant_capture() { PieceKind::Pawn } else { mv.captured().kind() };
    let mut gains = vec![piece_value(captured_kind)];
    let mut attacker_kind = mv.piece().kind();

    loop {
        let attackers = attackers_to_square(to, occ, pos, side) & occ;
        let Some((sq, kind)) = least_valuable_attacker(attackers, pos, side) else { break };

        gains.push(piece_value(attacker_kind) - gains[gains.len() - 1]);
        occ.clear(sq);
        attacker_kind = kind;
        side = side.opposite();
    }

    for i in (0..gains.len() - 1).rev() {
        gains[i] = gains[i].min(-gains[i + 1]);
    }
    gains[0]
}
