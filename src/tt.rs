//! Transposition cache: a flat array of 4-entry buckets, addressed by the
//! low bits of the Zobrist key and disambiguated by a partial key stored in
//! each slot, with generation-based replacement inside a bucket.

use crate::moves::Move;

const BUCKET_SIZE: usize = 4;

/// Confidence the stored score carries relative to the search window it was
/// produced under.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ScorePrecision {
    /// Slot has never been written.
    #[default]
    Unknown,
    /// The minimax value itself: no bound, every child was searched.
    Exact,
    /// A fail-high: the true value is at least this score.
    LowerBound,
    /// A fail-low: the true value is at most this score.
    UpperBound,
}

#[derive(Clone, Copy)]
struct Slot {
    partial_key: u32,
    depth: i8,
    score: i32,
    precision: ScorePrecision,
    best_move: Move,
    generation: u8,
}

impl Default for Slot {
    fn default() -> Self {
        Slot {
            partial_key: 0,
            depth: -1,
            score: 0,
            precision: ScorePrecision::Unknown,
            best_move: Move::NULL,
            generation: 0,
        }
    }
}

/// Everything the search needs back from a cache hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeResult {
    pub depth: i8,
    pub score: i32,
    pub precision: ScorePrecision,
    pub best_move: Move,
}

fn partial_key(hash: u64) -> u32 {
    (hash >> 32) as u32
}

/// Fixed-capacity, generation-replaced transposition cache. Sized in
/// megabytes; the bucket count is rounded down to a power of two so
/// indexing is a mask rather than a modulo.
pub struct TranspositionTable {
    buckets: Vec<[Slot; BUCKET_SIZE]>,
    mask: usize,
    generation: u8,
    occupied: usize,
}

impl TranspositionTable {
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bucket_bytes = BUCKET_SIZE * std::mem::size_of::<Slot>();
        let wanted_buckets = (size_mb.max(1) * 1024 * 1024 / bucket_bytes).max(1);
        let bucket_count = wanted_buckets.next_power_of_two().max(1024);
        TranspositionTable {
            buckets: vec![[Slot::default(); BUCKET_SIZE]; bucket_count],
            mask: bucket_count - 1,
            generation: 0,
            occupied: 0,
        }
    }

    fn bucket_index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Starts a new search: stale generations become eligible for eviction
    /// before fresher ones, without needing to touch every slot.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = [Slot::default(); BUCKET_SIZE];
        }
        self.occupied = 0;
        self.generation = 0;
    }

    #[must_use]
    pub fn probe(&self, key: u64) -> Option<ProbeResult> {
        let pk = partial_key(key);
        let bucket = &self.buckets[self.bucket_index(key)];
        bucket
            .iter()
            .find(|slot| slot.precision != ScorePrecision::Unknown && slot.partial_key == pk)
            .map(|slot| ProbeResult {
                depth: slot.depth,
                score: slot.score,
                precision: slot.precision,
                best_move: slot.best_move,
            })
    }

    /// Stores a search result. Overwrites an existing entry for the same
    /// key when the new search went at least as deep (or is exact);
    /// otherwise replaces the slot with the lowest `depth*2 - age`
    /// priority, where `age` is generations since that slot was last
    /// written.
    pub fn store(&mut self, key: u64, depth: i8, score: i32, precision: ScorePrecision, best_move: Move) {
        let pk = partial_key(key);
        let generation = self.generation;
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];

        if let Some(slot) = bucket.iter_mut().find(|slot| slot.precision != ScorePrecision::Unknown && slot.partial_key == pk) {
            if depth >= slot.depth || precision == ScorePrecision::Exact {
                let best_move = if best_move.is_null() { slot.best_move } else { best_move };
                *slot = Slot { partial_key: pk, depth, score, precision, best_move, generation };
            }
            return;
        }

        if let Some(slot) = bucket.iter_mut().find(|slot| slot.precision == ScorePrecision::Unknown) {
            *slot = Slot { partial_key: pk, depth, score, precision, best_move, generation };
            self.occupied += 1;
            return;
        }

        let replace = bucket
            .iter_mut()
            .min_by_key(|slot| {
                let age = generation.wrapping_sub(slot.generation) as i32;
                i32::from(slot.depth) * 2 - age
            })
            .expect("bucket is non-empty");
        *replace = Slot { partial_key: pk, depth, score, precision, best_move, generation };
    }

    /// Promille of slots ever written, for the UCI `hashfull` field.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let total_slots = self.buckets.len().saturating_mul(BUCKET_SIZE);
        if total_slots == 0 {
            return 0;
        }
        ((self.occupied as u64 * 1000) / total_slots as u64) as u32
    }

    #[must_use]
    pub fn len_entries(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }
}
