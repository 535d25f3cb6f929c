//! King safety: ring-based attacker counting, pawn shield and semi-open
//! files near the king. The whole term is a penalty attributed to the
//! color whose king is under threat or poorly sheltered.

use crate::bitboard::Bitboard;
use crate::geometry::{FILE_MASK, INNER_RING_MASK, KNIGHT_MOVE_MASK, OUTER_RING_MASK, PAWN_SHIELD_MASK};
use crate::magic;
use crate::position::Position;
use crate::types::{Color, Piece, PieceKind, Square};

/// (inner, outer) attack-unit weight per attacking piece kind.
fn ring_weight(kind: PieceKind) -> (i32, i32) {
    match kind {
        PieceKind::Knight | PieceKind::Bishop => (4, 2),
        PieceKind::Rook => (6, 3),
        PieceKind::Queen => (7, 4),
        _ => (0, 0),
    }
}

const THREAT_PENALTY_MG: [i32; 21] = [
    0, 4, 8, 12, 18, 26, 36, 48, 62, 78, 96, 116, 138, 162, 188, 216, 246, 278, 312, 348, 386,
];
const THREAT_PENALTY_EG: [i32; 21] = [
    0, 2, 4, 6, 9, 13, 18, 24, 31, 39, 48, 58, 69, 81, 94, 108, 123, 139, 156, 174, 193,
];

const SHIELD_MISSING_PEN_MG: i32 = 8;
const SHIELD_MISSING_PEN_EG: i32 = 3;
const OPEN_FILE_MG: i32 = -25;
const SEMI_OPEN_FILE_MG: i32 = -15;

fn attack_set(pos: &Position, kind: PieceKind, from: Square) -> Bitboard {
    match kind {
        PieceKind::Knight => KNIGHT_MOVE_MASK[from.as_index()],
        PieceKind::Bishop => magic::bishop_attacks(from, pos.occupancy),
        PieceKind::Rook => magic::rook_attacks(from, pos.occupancy),
        PieceKind::Queen => magic::queen_attacks(from, pos.occupancy),
        _ => Bitboard::EMPTY,
    }
}

/// (mg, eg) penalty for `color`'s own king: attacks the opponent lands on
/// its rings, plus pawn-shield and semi-open-file weaknesses around it.
#[must_use]
pub fn evaluate(pos: &Position, color: Color) -> (i32, i32) {
    let them = color.opposite();
    let own_king = pos.king_square(color);
    let inner = INNER_RING_MASK[own_king.as_index()];
    let outer = OUTER_RING_MASK[own_king.as_index()];

    let mut threat_units = 0;
    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        let (w_in, w_out) = ring_weight(kind);
        let piece = Piece::of(kind, them);
        for from in pos.piece_bitboards[piece.index()].iter() {
            let attacks = attack_set(pos, kind, from);
            threat_units += w_in * (attacks & inner).popcount() as i32 + w_out * (attacks & outer).popcount() as i32;
        }
    }

    let idx = ((threat_units / 8) as usize).min(THREAT_PENALTY_MG.len() - 1);
    let mut mg = -THREAT_PENALTY_MG[idx];
    let mut eg = -THREAT_PENALTY_EG[idx];

    let own_pawns = pos.piece_bitboards[Piece::of(PieceKind::Pawn, color).index()];
    let enemy_pawns = pos.piece_bitboards[Piece::of(PieceKind::Pawn, them).index()];

    let shield_present = (PAWN_SHIELD_MASK[color.index()][own_king.as_index()] & own_pawns).popcount() as i32;
    let missing = (3 - shield_present).max(0);
    mg -= missing * SHIELD_MISSING_PEN_MG;
    eg -= missing * SHIELD_MISSING_PEN_EG;

    let king_file = own_king.file();
    for file in king_file.saturating_sub(1)..=(king_file + 1).min(7) {
        let own_on_file = (FILE_MASK[file] & own_pawns).is_empty();
        let enemy_on_file = (FILE_MASK[file] & enemy_pawns).is_empty();
        if own_on_file && enemy_on_file {
            mg += OPEN_FILE_MG;
        } else if own_on_file {
            mg += SEMI_OPEN_FILE_MG;
        }
    }

    (mg, eg)
}
