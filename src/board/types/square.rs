//! Board points.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Team, BOARD_FILES, BOARD_RANKS};
use crate::board::error::SquareError;

/// A point on the board as (file, rank). File 0 is `a`, rank 0 is RED's
/// back rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Create a square. Coordinates must be on the board.
    #[inline]
    #[must_use]
    pub const fn new(file: u8, rank: u8) -> Self {
        debug_assert!((file as usize) < BOARD_FILES && (rank as usize) < BOARD_RANKS);
        Square { file, rank }
    }

    /// Create a square with bounds checking.
    #[inline]
    #[must_use]
    pub fn try_new(file: i32, rank: i32) -> Option<Self> {
        if (0..BOARD_FILES as i32).contains(&file) && (0..BOARD_RANKS as i32).contains(&rank) {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Table index `file * 10 + rank` (0..90).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.file as usize * BOARD_RANKS + self.rank as usize
    }

    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Square::new((index / BOARD_RANKS) as u8, (index % BOARD_RANKS) as u8)
    }

    #[inline]
    #[must_use]
    pub fn offset(self, file_delta: i32, rank_delta: i32) -> Option<Self> {
        Square::try_new(
            self.file as i32 + file_delta,
            self.rank as i32 + rank_delta,
        )
    }

    /// Left-right mirror (file -> 8 - file).
    #[inline]
    #[must_use]
    pub const fn mirror(self) -> Self {
        Square::new(8 - self.file, self.rank)
    }

    /// The same point seen from `team`'s side of the board.
    #[inline]
    #[must_use]
    pub const fn relative_to(self, team: Team) -> Self {
        match team {
            Team::Red => self,
            Team::Black => Square::new(self.file, 9 - self.rank),
        }
    }

    #[inline]
    #[must_use]
    pub const fn in_palace(self, team: Team) -> bool {
        let rank = self.relative_to(team).rank;
        self.file >= 3 && self.file <= 5 && rank <= 2
    }

    /// Whether the point lies on `team`'s side of the river.
    #[inline]
    #[must_use]
    pub const fn on_own_side(self, team: Team) -> bool {
        self.relative_to(team).rank <= 4
    }

    /// Whether a `team` piece standing here has crossed the river.
    #[inline]
    #[must_use]
    pub const fn crossed_river(self, team: Team) -> bool {
        !self.on_own_side(team)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank)
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareError::InvalidLength { len: s.len() });
        }
        let file = bytes[0];
        let rank = bytes[1];
        if !(b'a'..=b'i').contains(&file) {
            return Err(SquareError::InvalidFile { char: file as char });
        }
        if !rank.is_ascii_digit() {
            return Err(SquareError::InvalidRank { char: rank as char });
        }
        Ok(Square::new(file - b'a', rank - b'0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let sq: Square = "h2".parse().unwrap();
        assert_eq!(sq, Square::new(7, 2));
        assert_eq!(sq.to_string(), "h2");
        assert!("j0".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert!("ax".parse::<Square>().is_err());
    }

    #[test]
    fn test_palace_and_river() {
        assert!(Square::new(4, 1).in_palace(Team::Red));
        assert!(!Square::new(4, 1).in_palace(Team::Black));
        assert!(Square::new(3, 9).in_palace(Team::Black));
        assert!(!Square::new(2, 0).in_palace(Team::Red));

        assert!(Square::new(0, 5).crossed_river(Team::Red));
        assert!(!Square::new(0, 4).crossed_river(Team::Red));
        assert!(Square::new(0, 4).crossed_river(Team::Black));
    }

    #[test]
    fn test_index_round_trip_and_mirror() {
        for index in 0..90 {
            assert_eq!(Square::from_index(index).index(), index);
        }
        assert_eq!(Square::new(1, 7).mirror(), Square::new(7, 7));
        assert_eq!(Square::new(4, 0).mirror(), Square::new(4, 0));
    }
}
