//! Sliding-piece attack tables.
//!
//! For each square, every subset of the square's relevant-blocker mask is
//! enumerated once at startup and its reachable ray (stepping outward until
//! a blocker or the edge, inclusive of the blocker) is stored in a flat
//! table. A query extracts exactly the relevant-mask bits from the current
//! occupancy and uses that as a direct, collision-free index — a perfect
//! hash of the blocker subset, without needing a discovered magic multiplier.

use once_cell::sync::Lazy;

use crate::bitboard::Bitboard;
use crate::geometry::{self, BISHOP_DIRS, BISHOP_RELEVANT_MASK, ROOK_DIRS, ROOK_RELEVANT_MASK};
use crate::types::Square;

struct SlidingTable {
    flat: Vec<Bitboard>,
    offsets: [usize; 64],
    relevant_bits: [Vec<usize>; 64],
}

fn build_table(relevant_masks: &[Bitboard; 64], directions: &[(isize, isize)]) -> SlidingTable {
    let mut flat = Vec::new();
    let mut offsets = [0usize; 64];
    let relevant_bits: [Vec<usize>; 64] = std::array::from_fn(|sq| {
        let mask = relevant_masks[sq];
        (0..64).filter(|&i| mask.contains(Square::from_index(i))).collect()
    });

    for sq in 0..64 {
        let bits = &relevant_bits[sq];
        let subset_count = 1usize << bits.len();
        offsets[sq] = flat.len();
        for index in 0..subset_count {
            let mut occupancy = Bitboard::EMPTY;
            for (j, &bit_sq) in bits.iter().enumerate() {
                if (index >> j) & 1 != 0 {
                    occupancy.set(Square::from_index(bit_sq));
                }
            }
            flat.push(geometry::sliding_attacks_on_the_fly(sq, directions, occupancy));
        }
    }

    SlidingTable { flat, offsets, relevant_bits }
}

static BISHOP_TABLE: Lazy<SlidingTable> = Lazy::new(|| build_table(&BISHOP_RELEVANT_MASK, &BISHOP_DIRS));
static ROOK_TABLE: Lazy<SlidingTable> = Lazy::new(|| build_table(&ROOK_RELEVANT_MASK, &ROOK_DIRS));

fn lookup(table: &SlidingTable, sq: Square, occupancy: Bitboard) -> Bitboard {
    let idx = sq.as_index();
    let bits = &table.relevant_bits[idx];
    let mut subset_index = 0usize;
    for (j, &bit_sq) in bits.iter().enumerate() {
        if occupancy.contains(Square::from_index(bit_sq)) {
            subset_index |= 1 << j;
        }
    }
    table.flat[table.offsets[idx] + subset_index]
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    lookup(&BISHOP_TABLE, sq, occupancy)
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    lookup(&ROOK_TABLE, sq, occupancy)
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_attacks_on_empty_board_cover_full_rank_and_file() {
        let d4: Square = "d4".parse().unwrap();
        let attacks = rook_attacks(d4, Bitboard::EMPTY);
        assert_eq!(attacks.popcount(), 14);
    }

    #[test]
    fn rook_attacks_stop_at_first_blocker_inclusive() {
        let a1: Square = "a1".parse().unwrap();
        let a4: Square = "a4".parse().unwrap();
        let occ = Bitboard::from_square(a4);
        let attacks = rook_attacks(a1, occ);
        assert!(attacks.contains(a4));
        assert!(!attacks.contains("a5".parse().unwrap()));
        assert!(attacks.contains("a2".parse().unwrap()));
        assert!(attacks.contains("a3".parse().unwrap()));
    }

    #[test]
    fn bishop_attacks_from_center_on_empty_board() {
        let d4: Square = "d4".parse().unwrap();
        let attacks = bishop_attacks(d4, Bitboard::EMPTY);
        assert_eq!(attacks.popcount(), 13);
    }

    #[test]
    fn queen_attacks_union_bishop_and_rook() {
        let d4: Square = "d4".parse().unwrap();
        let q = queen_attacks(d4, Bitboard::EMPTY);
        let b = bishop_attacks(d4, Bitboard::EMPTY);
        let r = rook_attacks(d4, Bitboard::EMPTY);
        assert_eq!(q, b | r);
    }
}
