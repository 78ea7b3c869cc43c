//! Occupancy bitlines and the sliding-piece region cache.
//!
//! Every file and every rank is kept as a 10-bit occupancy line. For each of
//! the 1024 possible lines and each occupied position on a line, the cache
//! stores where a rook stops and where a cannon stops or captures. File
//! lines use all ten bits; rank lines only nine, so rank lookups clamp the
//! upper end from 9 to 8.

use std::fmt;

use once_cell::sync::Lazy;

use super::types::{Square, BOARD_FILES, BOARD_RANKS};

/// A 10-bit occupancy line. Bit `i` is set when position `i` is occupied.
pub type BitLine = u16;

const LINE_PATTERNS: usize = 1 << 10;
const LINE_SLOTS: usize = 10;

/// Highest index on a file line.
pub(crate) const FILE_LINE_END: u8 = 9;
/// Highest index on a rank line.
pub(crate) const RANK_LINE_END: u8 = 8;

/// Reach of a rook on one line: everything in `low..=high` except its own
/// position. Each end is either the nearest blocker or the edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RookRegion {
    pub low: u8,
    pub high: u8,
}

/// Reach of a cannon on one line. `low..=high` are the quiet destinations.
/// `low_target` / `high_target` are capture candidates beyond a screen; a
/// target equal to its quiet bound means there is none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CannonRegion {
    pub low_target: u8,
    pub low: u8,
    pub high: u8,
    pub high_target: u8,
}

impl CannonRegion {
    #[inline]
    #[must_use]
    pub fn low_capture(&self) -> Option<u8> {
        (self.low_target < self.low).then_some(self.low_target)
    }

    #[inline]
    #[must_use]
    pub fn high_capture(&self) -> Option<u8> {
        (self.high_target > self.high).then_some(self.high_target)
    }
}

/// Precomputed rook and cannon regions for every (line, position) pair.
///
/// Entries are only meaningful where the position's bit is set in the line.
pub struct BitRegionCache {
    rook: Box<[[RookRegion; LINE_SLOTS]; LINE_PATTERNS]>,
    cannon: Box<[[CannonRegion; LINE_SLOTS]; LINE_PATTERNS]>,
}

impl fmt::Debug for BitRegionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitRegionCache").finish_non_exhaustive()
    }
}

impl Default for BitRegionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BitRegionCache {
    #[must_use]
    pub fn new() -> Self {
        let mut rook = Box::new([[RookRegion::default(); LINE_SLOTS]; LINE_PATTERNS]);
        let mut cannon = Box::new([[CannonRegion::default(); LINE_SLOTS]; LINE_PATTERNS]);

        for line in 0..LINE_PATTERNS {
            let occupied = |i: usize| line & (1 << i) != 0;
            for index in (0..LINE_SLOTS).filter(|&i| occupied(i)) {
                let below = (0..index).rev().filter(|&i| occupied(i));
                let above = (index + 1..LINE_SLOTS).filter(|&i| occupied(i));
                let mut below = below.map(|i| i as u8);
                let mut above = above.map(|i| i as u8);

                let (low, low_target) = match below.next() {
                    Some(screen) => (screen + 1, below.next().unwrap_or(screen + 1)),
                    None => (0, 0),
                };
                let (high, high_target) = match above.next() {
                    Some(screen) => (screen - 1, above.next().unwrap_or(screen - 1)),
                    None => (FILE_LINE_END, FILE_LINE_END),
                };

                let rook_low = (0..index).rev().find(|&i| occupied(i)).unwrap_or(0) as u8;
                let rook_high = (index + 1..LINE_SLOTS)
                    .find(|&i| occupied(i))
                    .unwrap_or(LINE_SLOTS - 1) as u8;

                rook[line][index] = RookRegion {
                    low: rook_low,
                    high: rook_high,
                };
                cannon[line][index] = CannonRegion {
                    low_target,
                    low,
                    high,
                    high_target,
                };
            }
        }

        BitRegionCache { rook, cannon }
    }

    /// Rook region for the piece at `index` on `line`, clamped to `end`.
    #[inline]
    #[must_use]
    pub fn rook_region(&self, line: BitLine, index: u8, end: u8) -> RookRegion {
        debug_assert!(line & (1 << index) != 0, "no piece at {index} on line {line:#b}");
        let mut region = self.rook[line as usize][index as usize];
        if end == RANK_LINE_END && region.high == FILE_LINE_END {
            region.high = RANK_LINE_END;
        }
        region
    }

    /// Cannon region for the piece at `index` on `line`, clamped to `end`.
    #[inline]
    #[must_use]
    pub fn cannon_region(&self, line: BitLine, index: u8, end: u8) -> CannonRegion {
        debug_assert!(line & (1 << index) != 0, "no piece at {index} on line {line:#b}");
        let mut region = self.cannon[line as usize][index as usize];
        if end == RANK_LINE_END && region.high_target == FILE_LINE_END {
            region.high = RANK_LINE_END;
            region.high_target = RANK_LINE_END;
        }
        region
    }
}

/// Shared immutable cache, built on first use.
pub(crate) static REGIONS: Lazy<BitRegionCache> = Lazy::new(BitRegionCache::new);

/// Per-file and per-rank occupancy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bitlines {
    files: [BitLine; BOARD_FILES],
    ranks: [BitLine; BOARD_RANKS],
}

impl Bitlines {
    /// Occupancy of a file, bit = rank.
    #[inline]
    #[must_use]
    pub fn file(&self, file: u8) -> BitLine {
        self.files[file as usize]
    }

    /// Occupancy of a rank, bit = file.
    #[inline]
    #[must_use]
    pub fn rank(&self, rank: u8) -> BitLine {
        self.ranks[rank as usize]
    }

    #[inline]
    #[must_use]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.files[sq.file() as usize] & (1 << sq.rank()) != 0
    }

    #[inline]
    pub(crate) fn set(&mut self, sq: Square) {
        self.files[sq.file() as usize] |= 1 << sq.rank();
        self.ranks[sq.rank() as usize] |= 1 << sq.file();
    }

    #[inline]
    pub(crate) fn clear(&mut self, sq: Square) {
        self.files[sq.file() as usize] &= !(1 << sq.rank());
        self.ranks[sq.rank() as usize] &= !(1 << sq.file());
    }

    /// Number of occupied points strictly between two squares on one line.
    #[must_use]
    pub fn count_between(&self, a: Square, b: Square) -> Option<u32> {
        let (line, lo, hi) = if a.file() == b.file() {
            (self.file(a.file()), a.rank().min(b.rank()), a.rank().max(b.rank()))
        } else if a.rank() == b.rank() {
            (self.rank(a.rank()), a.file().min(b.file()), a.file().max(b.file()))
        } else {
            return None;
        };
        if hi <= lo + 1 {
            return Some(0);
        }
        let mask: BitLine = ((1 << hi) - 1) & !((1 << (lo + 1)) - 1);
        Some((line & mask).count_ones())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rook_region_open_line() {
        let cache = BitRegionCache::new();
        let region = cache.rook_region(0b0000010000, 4, FILE_LINE_END);
        assert_eq!(region, RookRegion { low: 0, high: 9 });
        let region = cache.rook_region(0b0000010000, 4, RANK_LINE_END);
        assert_eq!(region, RookRegion { low: 0, high: 8 });
    }

    #[test]
    fn test_rook_region_stops_at_blockers() {
        let cache = BitRegionCache::new();
        // blockers at 1 and 7, rook at 4
        let line = 0b0010010010;
        assert_eq!(
            cache.rook_region(line, 4, FILE_LINE_END),
            RookRegion { low: 1, high: 7 }
        );
    }

    #[test]
    fn test_cannon_region_with_screens_and_targets() {
        let cache = BitRegionCache::new();
        // pieces at 0, 2, 4 (cannon), 6, 9
        let line: BitLine = 0b1001010101;
        let region = cache.cannon_region(line, 4, FILE_LINE_END);
        assert_eq!(region.low, 3);
        assert_eq!(region.low_capture(), Some(0));
        assert_eq!(region.high, 5);
        assert_eq!(region.high_capture(), Some(9));
    }

    #[test]
    fn test_cannon_region_screen_without_target() {
        let cache = BitRegionCache::new();
        // cannon at 1, screen at 5, nothing beyond
        let line: BitLine = 0b0000100010;
        let region = cache.cannon_region(line, 1, FILE_LINE_END);
        assert_eq!(region.low, 0);
        assert_eq!(region.low_capture(), None);
        assert_eq!(region.high, 4);
        assert_eq!(region.high_capture(), None);
    }

    #[test]
    fn test_cannon_region_rank_clamp() {
        let cache = BitRegionCache::new();
        let region = cache.cannon_region(0b0000001000, 3, RANK_LINE_END);
        assert_eq!(region.high, 8);
        assert_eq!(region.high_capture(), None);
        let region = cache.cannon_region(0b0000001000, 3, FILE_LINE_END);
        assert_eq!(region.high, 9);
    }

    #[test]
    fn test_bitlines_set_clear_and_between() {
        let mut lines = Bitlines::default();
        let a = Square::new(1, 2);
        let b = Square::new(1, 6);
        lines.set(a);
        lines.set(b);
        lines.set(Square::new(1, 4));
        assert!(lines.is_occupied(a));
        assert_eq!(lines.rank(2), 0b10);
        assert_eq!(lines.count_between(a, b), Some(1));
        lines.clear(Square::new(1, 4));
        assert_eq!(lines.count_between(a, b), Some(0));
        assert_eq!(lines.count_between(a, Square::new(2, 3)), None);
    }
}
