//! Transposition table for caching search results.
//!
//! Each bucket keeps three independent records for one position: the best
//! exact value, the best lower bound (beta cutoff) and the best upper bound
//! (alpha failure). A bucket belongs to the position whose lock it stores.

use std::mem;

use crate::board::{MoveKey, BAN};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TTRecord {
    value: i32,
    depth: i32,
    best_move: Option<MoveKey>,
}

#[derive(Clone, Copy, Debug, Default)]
struct TTBucket {
    lock: u32,
    exact: Option<TTRecord>,
    lower: Option<TTRecord>,
    upper: Option<TTRecord>,
}

impl TTBucket {
    fn is_empty(&self) -> bool {
        self.exact.is_none() && self.lower.is_none() && self.upper.is_none()
    }

    fn deepest(&self) -> i32 {
        [self.exact, self.lower, self.upper]
            .iter()
            .flatten()
            .map(|r| r.depth)
            .max()
            .unwrap_or(i32::MIN)
    }
}

/// Mate scores are stored relative to the node, not the root.
#[inline]
fn value_to_tt(value: i32, distance: i32) -> i32 {
    if value >= BAN {
        value + distance
    } else if value <= -BAN {
        value - distance
    } else {
        value
    }
}

#[inline]
fn value_from_tt(value: i32, distance: i32) -> i32 {
    if value >= BAN {
        value - distance
    } else if value <= -BAN {
        value + distance
    } else {
        value
    }
}

pub struct TranspositionTable {
    buckets: Vec<TTBucket>,
    mask: usize,
}

/// Smallest table, in buckets (log2).
const MIN_HASH_LEVEL: u32 = 10;
/// Default table, in buckets (log2).
pub const DEFAULT_HASH_LEVEL: u32 = 20;

impl TranspositionTable {
    /// Create a table of `2^hash_level` buckets.
    #[must_use]
    pub fn with_hash_level(hash_level: u32) -> Self {
        let size = 1usize << hash_level.max(MIN_HASH_LEVEL);
        TranspositionTable {
            buckets: vec![TTBucket::default(); size],
            mask: size - 1,
        }
    }

    /// Create the largest power-of-two table that fits in `size_mb` megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bucket_size = mem::size_of::<TTBucket>();
        let buckets = (size_mb * 1024 * 1024 / bucket_size).max(1);
        let level = usize::BITS - 1 - buckets.leading_zeros();
        Self::with_hash_level(level)
    }

    /// Number of buckets.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn index(&self, key: u32) -> usize {
        key as usize & self.mask
    }

    /// Record a search result for the position (`key`, `lock`).
    ///
    /// Records only improve: deeper results replace shallower ones; at equal
    /// depth a lower bound must rise and an upper bound must fall. A bucket
    /// owned by another position is taken over only by a result at least as
    /// deep as anything it holds.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        key: u32,
        lock: u32,
        distance: usize,
        bound: BoundType,
        depth: i32,
        value: i32,
        best_move: Option<MoveKey>,
    ) {
        let index = self.index(key);
        let bucket = &mut self.buckets[index];
        if bucket.lock != lock {
            if !bucket.is_empty() && bucket.deepest() > depth {
                return;
            }
            *bucket = TTBucket {
                lock,
                ..TTBucket::default()
            };
        }

        let record = TTRecord {
            value: value_to_tt(value, distance as i32),
            depth,
            best_move,
        };
        match bound {
            BoundType::Exact => {
                if bucket.exact.map_or(true, |old| depth > old.depth) {
                    bucket.exact = Some(record);
                }
            }
            BoundType::LowerBound => {
                if bucket.lower.map_or(true, |old| {
                    depth > old.depth || (depth == old.depth && record.value > old.value)
                }) {
                    bucket.lower = Some(record);
                }
            }
            BoundType::UpperBound => {
                if bucket.upper.map_or(true, |old| {
                    depth > old.depth || (depth == old.depth && record.value < old.value)
                }) {
                    bucket.upper = Some(record);
                }
            }
        }
    }

    fn bucket(&self, key: u32, lock: u32) -> Option<&TTBucket> {
        let bucket = &self.buckets[self.index(key)];
        (bucket.lock == lock && !bucket.is_empty()).then_some(bucket)
    }

    /// A value usable at `depth` inside the window (`alpha`, `beta`), if
    /// one is cached.
    #[must_use]
    pub fn probe_value(
        &self,
        key: u32,
        lock: u32,
        distance: usize,
        depth: i32,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let bucket = self.bucket(key, lock)?;
        let distance = distance as i32;
        let usable = |record: &Option<TTRecord>| {
            record
                .filter(|r| r.depth >= depth)
                .map(|r| value_from_tt(r.value, distance))
        };

        if let Some(value) = usable(&bucket.exact) {
            return Some(value);
        }
        if let Some(value) = usable(&bucket.lower).filter(|&v| v >= beta) {
            return Some(value);
        }
        usable(&bucket.upper).filter(|&v| v <= alpha)
    }

    /// Candidate moves for the position, best record first (exact, lower
    /// bound, upper bound). Callers must check legality.
    #[must_use]
    pub fn probe_moves(&self, key: u32, lock: u32) -> Vec<MoveKey> {
        let Some(bucket) = self.bucket(key, lock) else {
            return Vec::new();
        };
        let mut moves = Vec::with_capacity(3);
        for mv in [bucket.exact, bucket.lower, bucket.upper]
            .iter()
            .flatten()
            .filter_map(|r| r.best_move)
        {
            if !moves.contains(&mv) {
                moves.push(mv);
            }
        }
        moves
    }

    /// Returns table fullness in per mille (0-1000), sampled.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.buckets.len().min(1000);
        let used = self
            .buckets
            .iter()
            .take(sample)
            .filter(|b| !b.is_empty())
            .count();
        (used * 1000 / sample) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&mut self) {
        self.buckets.fill(TTBucket::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Square, INF};

    const KEY: u32 = 0x1234_5678;
    const LOCK: u32 = 0x9abc_def0;

    fn mv(id: i32) -> Option<MoveKey> {
        MoveKey::from_id(id)
    }

    #[test]
    fn test_store_and_probe_exact() {
        let mut tt = TranspositionTable::with_hash_level(10);
        tt.store(KEY, LOCK, 0, BoundType::Exact, 4, 120, mv(7242));
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 4, -INF, INF), Some(120));
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 3, -INF, INF), Some(120));
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 5, -INF, INF), None);
        assert_eq!(tt.probe_moves(KEY, LOCK), vec![MoveKey::new(Square::new(7, 2), Square::new(4, 2))]);
    }

    #[test]
    fn test_lock_mismatch_is_a_miss() {
        let mut tt = TranspositionTable::with_hash_level(10);
        tt.store(KEY, LOCK, 0, BoundType::Exact, 4, 120, mv(7242));
        assert_eq!(tt.probe_value(KEY, LOCK ^ 1, 0, 1, -INF, INF), None);
        assert!(tt.probe_moves(KEY, LOCK ^ 1).is_empty());
    }

    #[test]
    fn test_exact_depth_preferred_replacement() {
        let mut tt = TranspositionTable::with_hash_level(10);
        tt.store(KEY, LOCK, 0, BoundType::Exact, 5, 50, mv(7242));
        tt.store(KEY, LOCK, 0, BoundType::Exact, 2, -80, mv(1020));
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 1, -INF, INF), Some(50));
        tt.store(KEY, LOCK, 0, BoundType::Exact, 6, -80, mv(1020));
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 1, -INF, INF), Some(-80));
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 6, -INF, INF), Some(-80));
    }

    #[test]
    fn test_bounds_respect_window() {
        let mut tt = TranspositionTable::with_hash_level(10);
        tt.store(KEY, LOCK, 0, BoundType::LowerBound, 3, 200, mv(7242));
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 3, 150, 180), Some(200));
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 3, 150, 250), None);

        tt.store(KEY, LOCK, 0, BoundType::LowerBound, 3, 100, None);
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 3, 150, 180), Some(200));
        tt.store(KEY, LOCK, 0, BoundType::LowerBound, 3, 300, None);
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 3, 250, 280), Some(300));

        tt.store(KEY, LOCK, 0, BoundType::UpperBound, 3, -40, None);
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 3, -30, -20), Some(-40));
        tt.store(KEY, LOCK, 0, BoundType::UpperBound, 3, 10, None);
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 3, -30, -20), Some(-40));
    }

    #[test]
    fn test_mate_scores_are_distance_independent() {
        let mut tt = TranspositionTable::with_hash_level(10);
        // Mate found 7 plies from the root, stored at distance 3.
        tt.store(KEY, LOCK, 3, BoundType::Exact, 4, INF - 7, None);
        // Reached again at distance 5: mate is now 9 plies from the root.
        assert_eq!(tt.probe_value(KEY, LOCK, 5, 4, -INF, INF), Some(INF - 9));
        tt.store(KEY, LOCK ^ 2, 2, BoundType::Exact, 4, -INF + 6, None);
        assert_eq!(tt.probe_value(KEY, LOCK ^ 2, 0, 4, -INF, INF), Some(-INF + 4));
    }

    #[test]
    fn test_foreign_bucket_kept_against_shallower_writes() {
        let mut tt = TranspositionTable::with_hash_level(10);
        tt.store(KEY, LOCK, 0, BoundType::Exact, 6, 10, None);
        tt.store(KEY, LOCK ^ 4, 0, BoundType::Exact, 2, 20, None);
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 6, -INF, INF), Some(10));
        tt.store(KEY, LOCK ^ 4, 0, BoundType::Exact, 7, 20, None);
        assert_eq!(tt.probe_value(KEY, LOCK, 0, 1, -INF, INF), None);
        assert_eq!(tt.probe_value(KEY, LOCK ^ 4, 0, 7, -INF, INF), Some(20));
    }

    #[test]
    fn test_clear_and_hashfull() {
        let mut tt = TranspositionTable::with_hash_level(10);
        assert_eq!(tt.hashfull_per_mille(), 0);
        for key in 0..512u32 {
            tt.store(key, key + 1, 0, BoundType::Exact, 1, 0, None);
        }
        assert_eq!(tt.hashfull_per_mille(), 512);
        tt.clear();
        assert_eq!(tt.hashfull_per_mille(), 0);
        assert_eq!(tt.capacity(), 1024);
    }
}
