//! Zobrist hashing tables and incremental key maintenance helpers.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::types::{Piece, Square};

struct ZobristKeys {
    /// piece_square[piece.index()][square]; index 0 (Piece::NONE) is unused.
    piece_square: [[u64; 64]; 13],
    black_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x5EED_C0FF_EE15_BEEF);
        let mut piece_square = [[0u64; 64]; 13];
        for piece_row in piece_square.iter_mut().skip(1) {
            for key in piece_row.iter_mut() {
                *key = rng.gen();
            }
        }
        let black_to_move = rng.gen();
        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = rng.gen();
        }
        let mut en_passant_file = [0u64; 8];
        for key in en_passant_file.iter_mut() {
            *key = rng.gen();
        }
        ZobristKeys { piece_square, black_to_move, castling, en_passant_file }
    }
}

static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[inline]
#[must_use]
pub fn piece_square_key(piece: Piece, sq: Square) -> u64 {
    ZOBRIST.piece_square[piece.index()][sq.as_index()]
}

#[inline]
#[must_use]
pub fn black_to_move_key() -> u64 {
    ZOBRIST.black_to_move
}

#[inline]
#[must_use]
pub fn castling_key(rights: u8) -> u64 {
    ZOBRIST.castling[(rights & 0xF) as usize]
}

#[inline]
#[must_use]
pub fn en_passant_key(file: usize) -> u64 {
    ZOBRIST.en_passant_file[file & 7]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, PieceKind};

    #[test]
    fn piece_square_keys_are_distinct() {
        let a = piece_square_key(Piece::of(PieceKind::Pawn, Color::White), Square::from_index(0));
        let b = piece_square_key(Piece::of(PieceKind::Pawn, Color::White), Square::from_index(1));
        let c = piece_square_key(Piece::of(PieceKind::Knight, Color::White), Square::from_index(0));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn keys_are_deterministic_across_calls() {
        let k1 = castling_key(0b1010);
        let k2 = castling_key(0b1010);
        assert_eq!(k1, k2);
    }
}
