//! Precomputed board-geometry tables: attack masks for non-sliding pieces,
//! "between" rays, pawn-structure masks and castling masks.
//!
//! Everything here is built once, lazily, at first use and never mutated
//! afterward (mirrors the teacher's `magic/magic.rs` / `zobrist.rs` use of
//! `once_cell::sync::Lazy` for global, process-lifetime tables).

use once_cell::sync::Lazy;

use crate::bitboard::Bitboard;
use crate::types::{Color, Square};

fn in_bounds(r: isize, f: isize) -> bool {
    (0..8).contains(&r) && (0..8).contains(&f)
}

fn step_mask(sq: usize, deltas: &[(isize, isize)]) -> Bitboard {
    let rank = sq_rank(sq) as isize;
    let file = sq_file(sq) as isize;
    let mut bb = Bitboard::EMPTY;
    for &(dr, df) in deltas {
        let r = rank + dr;
        let f = file + df;
        if in_bounds(r, f) {
            bb.set(Square::new(r as usize, f as usize));
        }
    }
    bb
}

fn sq_rank(idx: usize) -> usize {
    7 - idx / 8
}

fn sq_file(idx: usize) -> usize {
    idx % 8
}

pub static KNIGHT_MOVE_MASK: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    const DELTAS: [(isize, isize); 8] = [
        (1, 2), (2, 1), (2, -1), (1, -2),
        (-1, -2), (-2, -1), (-2, 1), (-1, 2),
    ];
    let mut out = [Bitboard::EMPTY; 64];
    for (sq, slot) in out.iter_mut().enumerate() {
        *slot = step_mask(sq, &DELTAS);
    }
    out
});

pub static KING_MOVE_MASK: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    const DELTAS: [(isize, isize); 8] = [
        (1, 0), (1, 1), (0, 1), (-1, 1),
        (-1, 0), (-1, -1), (0, -1), (1, -1),
    ];
    let mut out = [Bitboard::EMPTY; 64];
    for (sq, slot) in out.iter_mut().enumerate() {
        *slot = step_mask(sq, &DELTAS);
    }
    out
});

/// Pawn single (and, from the initial rank, double) push targets.
pub static PAWN_MOVE_MASK: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut out = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let rank = sq_rank(sq);
        let file = sq_file(sq);
        if rank < 7 {
            out[0][sq].set(Square::new(rank + 1, file));
            if rank == 1 {
                out[0][sq].set(Square::new(rank + 2, file));
            }
        }
        if rank > 0 {
            out[1][sq].set(Square::new(rank - 1, file));
            if rank == 6 {
                out[1][sq].set(Square::new(rank - 2, file));
            }
        }
    }
    out
});

/// The single intermediate square of a double pawn push (used to detect a
/// blocked double push).
pub static PAWN_DOUBLE_MOVE_MASK: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut out = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let rank = sq_rank(sq);
        let file = sq_file(sq);
        if rank == 1 {
            out[0][sq].set(Square::new(rank + 1, file));
        }
        if rank == 6 {
            out[1][sq].set(Square::new(rank - 1, file));
        }
    }
    out
});

pub static PAWN_ATTACK_MASK: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut out = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let rank = sq_rank(sq) as isize;
        let file = sq_file(sq) as isize;
        for &df in &[-1isize, 1] {
            if in_bounds(rank + 1, file + df) {
                out[0][sq].set(Square::new((rank + 1) as usize, (file + df) as usize));
            }
            if in_bounds(rank - 1, file + df) {
                out[1][sq].set(Square::new((rank - 1) as usize, (file + df) as usize));
            }
        }
    }
    out
});

/// Relevant-blocker masks for sliding pieces: board-edge squares along each
/// ray are excluded because the edge itself never needs a blocker bit.
pub static BISHOP_RELEVANT_MASK: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut out = [Bitboard::EMPTY; 64];
    for (sq, slot) in out.iter_mut().enumerate() {
        *slot = ray_mask(sq, &[(1, 1), (1, -1), (-1, 1), (-1, -1)], true);
    }
    out
});

pub static ROOK_RELEVANT_MASK: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut out = [Bitboard::EMPTY; 64];
    for (sq, slot) in out.iter_mut().enumerate() {
        *slot = ray_mask(sq, &[(1, 0), (-1, 0), (0, 1), (0, -1)], true);
    }
    out
});

/// Full, unbounded ray in each direction (used for the "between" table and
/// for the fallback ray-walking attack generator magic.rs enumerates from).
pub fn ray_mask(sq: usize, directions: &[(isize, isize)], exclude_edge: bool) -> Bitboard {
    let rank = sq_rank(sq) as isize;
    let file = sq_file(sq) as isize;
    let mut bb = Bitboard::EMPTY;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while in_bounds(r, f) {
            if exclude_edge {
                let next_r = r + dr;
                let next_f = f + df;
                if !in_bounds(next_r, next_f) {
                    break;
                }
            }
            bb.set(Square::new(r as usize, f as usize));
            r += dr;
            f += df;
        }
    }
    bb
}

pub fn sliding_attacks_on_the_fly(sq: usize, directions: &[(isize, isize)], occupancy: Bitboard) -> Bitboard {
    let rank = sq_rank(sq) as isize;
    let file = sq_file(sq) as isize;
    let mut bb = Bitboard::EMPTY;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while in_bounds(r, f) {
            let target = Square::new(r as usize, f as usize);
            bb.set(target);
            if occupancy.contains(target) {
                break;
            }
            r += dr;
            f += df;
        }
    }
    bb
}

pub const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// All eight squares of each file, indexed by file 0 (a) through 7 (h).
pub static FILE_MASK: Lazy<[Bitboard; 8]> = Lazy::new(|| {
    let mut out = [Bitboard::EMPTY; 8];
    for (idx, mask) in out.iter_mut().enumerate() {
        for rank in 0..8 {
            mask.set(Square::new(rank, idx));
        }
    }
    out
});

/// All eight squares of each rank, indexed by rank 0 ("1") through 7 ("8").
pub static RANK_MASK: Lazy<[Bitboard; 8]> = Lazy::new(|| {
    let mut out = [Bitboard::EMPTY; 8];
    for (idx, mask) in out.iter_mut().enumerate() {
        for file in 0..8 {
            mask.set(Square::new(idx, file));
        }
    }
    out
});

/// Squares strictly between `a` and `b` along a shared rank, file or
/// diagonal; empty if no such ray exists.
pub static BETWEEN_SQUARES: Lazy<[[Bitboard; 64]; 64]> = Lazy::new(|| {
    let mut out = vec![[Bitboard::EMPTY; 64]; 64];
    for a in 0..64usize {
        for dirs in [&BISHOP_DIRS[..], &ROOK_DIRS[..]] {
            for &(dr, df) in dirs {
                let mut between = Bitboard::EMPTY;
                let rank = sq_rank(a) as isize;
                let file = sq_file(a) as isize;
                let mut r = rank + dr;
                let mut f = file + df;
                while in_bounds(r, f) {
                    let b = Square::new(r as usize, f as usize).as_index();
                    out[a][b] = between;
                    between.set(Square::from_index(b));
                    r += dr;
                    f += df;
                }
            }
        }
    }
    let mut arr = [[Bitboard::EMPTY; 64]; 64];
    for a in 0..64 {
        arr[a] = out[a];
    }
    arr
});

/// Union of the three forward files (own file + both adjacent) from `sq`
/// up to the promotion rank, for `color`.
pub static PASSED_PAWN_MASK: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut out = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let rank = sq_rank(sq) as isize;
        let file = sq_file(sq) as isize;
        for &color_idx in &[0usize, 1] {
            let mut bb = Bitboard::EMPTY;
            let dir: isize = if color_idx == 0 { 1 } else { -1 };
            let mut r = rank + dir;
            while (0..8).contains(&r) {
                for df in [-1isize, 0, 1] {
                    let f = file + df;
                    if (0..8).contains(&f) {
                        bb.set(Square::new(r as usize, f as usize));
                    }
                }
                r += dir;
            }
            out[color_idx][sq] = bb;
        }
    }
    out
});

/// Single forward file from `sq` up to the promotion rank.
pub static FREE_PAWN_MASK: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut out = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let rank = sq_rank(sq) as isize;
        let file = sq_file(sq) as isize;
        for &color_idx in &[0usize, 1] {
            let mut bb = Bitboard::EMPTY;
            let dir: isize = if color_idx == 0 { 1 } else { -1 };
            let mut r = rank + dir;
            while (0..8).contains(&r) {
                bb.set(Square::new(r as usize, file as usize));
                r += dir;
            }
            out[color_idx][sq] = bb;
        }
    }
    out
});

/// The three squares on the next rank toward the enemy, used to score
/// pawn-shield presence in front of a king.
pub static PAWN_SHIELD_MASK: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut out = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let rank = sq_rank(sq) as isize;
        let file = sq_file(sq) as isize;
        for &color_idx in &[0usize, 1] {
            let dir: isize = if color_idx == 0 { 1 } else { -1 };
            let r = rank + dir;
            if (0..8).contains(&r) {
                let mut bb = Bitboard::EMPTY;
                for df in [-1isize, 0, 1] {
                    let f = file + df;
                    if (0..8).contains(&f) {
                        bb.set(Square::new(r as usize, f as usize));
                    }
                }
                out[color_idx][sq] = bb;
            }
        }
    }
    out
});

pub static INNER_RING_MASK: Lazy<[Bitboard; 64]> = Lazy::new(|| KING_MOVE_MASK.clone());

pub static OUTER_RING_MASK: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut out = [Bitboard::EMPTY; 64];
    for sq in 0..64 {
        let inner = INNER_RING_MASK[sq];
        let mut outer = Bitboard::EMPTY;
        for inner_sq in inner.iter() {
            outer |= KING_MOVE_MASK[inner_sq.as_index()];
        }
        outer |= KING_MOVE_MASK[sq];
        out[sq] = outer & !inner & !Bitboard::from_square(Square::from_index(sq));
    }
    out
});

/// Distance (in king moves) from `sq` to the nearest corner of the given
/// bishop's square color (used by the KBN-vs-K endgame evaluation).
#[must_use]
pub fn distance_to_nearest_same_color_corner(sq: Square, bishop_is_light: bool) -> i32 {
    let corners = if bishop_is_light {
        [Square::new(7, 0), Square::new(0, 7)] // a8, h1 are light under our LIGHT_SQUARES mask
    } else {
        [Square::new(7, 7), Square::new(0, 0)] // h8, a1 are dark
    };
    corners
        .iter()
        .map(|&c| sq.chebyshev_distance(c))
        .min()
        .unwrap_or(0)
}

/// Distance to the nearest board corner, used to drive a lone king toward
/// the edge in a won K-vs-K-plus-material endgame.
#[must_use]
pub fn distance_to_nearest_corner(sq: Square) -> i32 {
    let corners = [
        Square::new(0, 0),
        Square::new(0, 7),
        Square::new(7, 0),
        Square::new(7, 7),
    ];
    corners
        .iter()
        .map(|&c| sq.chebyshev_distance(c))
        .min()
        .unwrap_or(0)
}

/// Squares that must be empty for castling, indexed `[color][kingside?]`.
pub static CASTLE_EMPTY_SQUARES_MASK: Lazy<[[Bitboard; 2]; 2]> = Lazy::new(|| {
    let mut out = [[Bitboard::EMPTY; 2]; 2];
    // White kingside: f1, g1. White queenside: b1, c1, d1.
    out[0][0] = Bitboard::from_square(Square::new(0, 5)) | Bitboard::from_square(Square::new(0, 6));
    out[0][1] = Bitboard::from_square(Square::new(0, 1))
        | Bitboard::from_square(Square::new(0, 2))
        | Bitboard::from_square(Square::new(0, 3));
    out[1][0] = Bitboard::from_square(Square::new(7, 5)) | Bitboard::from_square(Square::new(7, 6));
    out[1][1] = Bitboard::from_square(Square::new(7, 1))
        | Bitboard::from_square(Square::new(7, 2))
        | Bitboard::from_square(Square::new(7, 3));
    out
});

/// Squares that must not be attacked for castling to be legal (the king's
/// start, transit and destination squares), indexed `[color][kingside?]`.
pub static CASTLE_ATTACKED_SQUARES_MASK: Lazy<[[Bitboard; 2]; 2]> = Lazy::new(|| {
    let mut out = [[Bitboard::EMPTY; 2]; 2];
    out[0][0] = Bitboard::from_square(Square::new(0, 4))
        | Bitboard::from_square(Square::new(0, 5))
        | Bitboard::from_square(Square::new(0, 6));
    out[0][1] = Bitboard::from_square(Square::new(0, 4))
        | Bitboard::from_square(Square::new(0, 3))
        | Bitboard::from_square(Square::new(0, 2));
    out[1][0] = Bitboard::from_square(Square::new(7, 4))
        | Bitboard::from_square(Square::new(7, 5))
        | Bitboard::from_square(Square::new(7, 6));
    out[1][1] = Bitboard::from_square(Square::new(7, 4))
        | Bitboard::from_square(Square::new(7, 3))
        | Bitboard::from_square(Square::new(7, 2));
    out
});

/// King destination square for castling, indexed `[color][kingside?]`.
#[must_use]
pub fn castle_king_destination(color: Color, kingside: bool) -> Square {
    match (color, kingside) {
        (Color::White, true) => Square::new(0, 6),
        (Color::White, false) => Square::new(0, 2),
        (Color::Black, true) => Square::new(7, 6),
        (Color::Black, false) => Square::new(7, 2),
    }
}

/// Rook source/destination squares for castling, indexed `[color][kingside?]`.
#[must_use]
pub fn castle_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    match (color, kingside) {
        (Color::White, true) => (Square::new(0, 7), Square::new(0, 5)),
        (Color::White, false) => (Square::new(0, 0), Square::new(0, 3)),
        (Color::Black, true) => (Square::new(7, 7), Square::new(7, 5)),
        (Color::Black, false) => (Square::new(7, 0), Square::new(7, 3)),
    }
}

/// `relative_rank(rank, color)`: rank 0 is always "own first rank".
#[inline]
#[must_use]
pub fn relative_rank(rank: usize, color: Color) -> usize {
    match color {
        Color::White => rank,
        Color::Black => 7 - rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_attacks_from_c5_match_spec_scenario() {
        // c5 = rank index 4 (rank "5"), file index 2
        let c5 = Square::new(4, 2);
        let attacks = KNIGHT_MOVE_MASK[c5.as_index()];
        let expected: [&str; 8] = ["b7", "d7", "e6", "e4", "d3", "b3", "a4", "a6"];
        for sq_str in expected {
            let sq: Square = sq_str.parse().unwrap();
            assert!(attacks.contains(sq), "missing {sq_str}");
        }
        assert_eq!(attacks.popcount(), 8);
    }

    #[test]
    fn between_squares_empty_when_no_shared_ray() {
        let a1: Square = "a1".parse().unwrap();
        let b3: Square = "b3".parse().unwrap();
        assert!(BETWEEN_SQUARES[a1.as_index()][b3.as_index()].is_empty());
    }

    #[test]
    fn between_squares_along_rank() {
        let a1: Square = "a1".parse().unwrap();
        let d1: Square = "d1".parse().unwrap();
        let between = BETWEEN_SQUARES[a1.as_index()][d1.as_index()];
        assert_eq!(between.popcount(), 2);
        assert!(between.contains("b1".parse().unwrap()));
        assert!(between.contains("c1".parse().unwrap()));
    }

    #[test]
    fn passed_pawn_mask_covers_three_files_ahead() {
        let e4: Square = "e4".parse().unwrap();
        let mask = PASSED_PAWN_MASK[0][e4.as_index()];
        // All squares on d, e, f files with rank >= 5
        for file in [3usize, 4, 5] {
            for rank in 4..8 {
                assert!(mask.contains(Square::new(rank, file)));
            }
        }
        assert!(!mask.contains(Square::new(3, 4)));
    }
}
