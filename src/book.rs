//! Opening book lookup.
//!
//! A book file is a flat array of 8-byte little-endian records sorted by
//! position lock:
//!
//! | bytes | field  | meaning                                   |
//! |-------|--------|-------------------------------------------|
//! | 0..4  | lock   | Zobrist lock of the position              |
//! | 4..6  | move   | `src | dst << 8` on a 16x16 padded board  |
//! | 6..8  | weight | relative probability of playing the move  |
//!
//! A padded point `sq` maps to file `(sq & 15) - 3` and rank
//! `12 - (sq >> 4)`. Positions are also looked up by their mirror lock, in
//! which case the stored move is mirrored back.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::board::{Board, Move, MoveKey, Square};

/// Size of one encoded record in bytes.
pub const BOOK_RECORD_SIZE: usize = 8;

/// One candidate move for one position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookRecord {
    pub lock: u32,
    pub mv: u16,
    pub weight: u16,
}

impl BookRecord {
    #[must_use]
    pub fn decode(bytes: [u8; BOOK_RECORD_SIZE]) -> Self {
        BookRecord {
            lock: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            mv: u16::from_le_bytes([bytes[4], bytes[5]]),
            weight: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }

    #[must_use]
    pub fn encode(&self) -> [u8; BOOK_RECORD_SIZE] {
        let mut bytes = [0u8; BOOK_RECORD_SIZE];
        bytes[0..4].copy_from_slice(&self.lock.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.mv.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.weight.to_le_bytes());
        bytes
    }

    /// The stored move, mirrored left-right when `mirrored`.
    #[must_use]
    pub fn move_key(&self, mirrored: bool) -> Option<MoveKey> {
        let from = decode_square((self.mv & 0xFF) as u8)?;
        let to = decode_square((self.mv >> 8) as u8)?;
        Some(if mirrored {
            MoveKey::new(from.mirror(), to.mirror())
        } else {
            MoveKey::new(from, to)
        })
    }

    /// Encode `key` in the book's move format.
    #[must_use]
    pub fn encode_move(key: MoveKey) -> u16 {
        u16::from(encode_square(key.from)) | (u16::from(encode_square(key.to)) << 8)
    }
}

fn decode_square(sq: u8) -> Option<Square> {
    Square::try_new(i32::from(sq & 15) - 3, 12 - i32::from(sq >> 4))
}

fn encode_square(sq: Square) -> u8 {
    ((12 - sq.rank()) << 4) | (sq.file() + 3)
}

/// An in-memory opening book.
#[derive(Clone, Debug, Default)]
pub struct OpeningBook {
    records: Vec<BookRecord>,
}

impl OpeningBook {
    /// Load a book file. A trailing partial record is ignored.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let book = Self::from_bytes(&bytes);
        debug!(
            "loaded {} book records from {}",
            book.len(),
            path.as_ref().display()
        );
        Ok(book)
    }

    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let records = bytes
            .chunks_exact(BOOK_RECORD_SIZE)
            .map(|chunk| {
                let mut record = [0u8; BOOK_RECORD_SIZE];
                record.copy_from_slice(chunk);
                BookRecord::decode(record)
            })
            .collect();
        Self::from_records(records)
    }

    /// Build a book from records in any order.
    #[must_use]
    pub fn from_records(mut records: Vec<BookRecord>) -> Self {
        records.sort_by_key(|r| r.lock);
        OpeningBook { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records stored for `lock`.
    #[must_use]
    pub fn entries(&self, lock: u32) -> &[BookRecord] {
        let start = self.records.partition_point(|r| r.lock < lock);
        let end = start + self.records[start..].partition_point(|r| r.lock == lock);
        &self.records[start..end]
    }

    /// Candidate moves for the position with their weights. Tries the
    /// position itself, then its mirror image.
    #[must_use]
    pub fn candidates(&self, board: &Board) -> Vec<(MoveKey, u16)> {
        let (_, mirror_lock) = board.mirror_hash();
        for (lock, mirrored) in [(board.lock(), false), (mirror_lock, true)] {
            let entries = self.entries(lock);
            if !entries.is_empty() {
                return entries
                    .iter()
                    .filter(|r| r.weight > 0)
                    .filter_map(|r| r.move_key(mirrored).map(|key| (key, r.weight)))
                    .collect();
            }
        }
        Vec::new()
    }

    /// Pick a book move with probability proportional to its weight.
    ///
    /// Returns `None` when the position is not in the book or the picked
    /// move is not legal on `board`.
    pub fn probe<R: Rng + ?Sized>(&self, board: &mut Board, rng: &mut R) -> Option<Move> {
        let candidates = self.candidates(board);
        let weights = WeightedIndex::new(candidates.iter().map(|&(_, w)| w)).ok()?;
        let (key, _) = candidates[weights.sample(rng)];
        let mv = board.validate_move(key);
        if mv.is_none() {
            debug!("book move {key} is illegal here");
        }
        mv
    }
}
