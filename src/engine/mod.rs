//! Engine front end: a position, its persistent search tables, an optional
//! opening book and the moves banned for the next search.
//!
//! [`SearchEngine`] is the synchronous core; [`EngineController`] runs it
//! on a dedicated thread for the text protocol.

mod controller;

use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{
    search, Board, Move, MoveKey, SearchConfig, SearchError, SearchResult, SearchState,
    SearchStats, Team,
};
use crate::book::OpeningBook;
use crate::tt::DEFAULT_HASH_LEVEL;

pub use controller::{EngineController, GoParams, SearchJob};

/// Default time budget for [`SearchEngine::search_main`] callers that have
/// no clock information.
pub const DEFAULT_MAX_TIME_SECS: u64 = 3;

pub struct SearchEngine {
    board: Board,
    state: SearchState,
    book: Option<OpeningBook>,
    use_book: bool,
    banned: Vec<MoveKey>,
    rng: StdRng,
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new(DEFAULT_HASH_LEVEL)
    }
}

impl SearchEngine {
    /// Engine on the start position with a `2^hash_level` bucket table.
    #[must_use]
    pub fn new(hash_level: u32) -> Self {
        SearchEngine {
            board: Board::new(),
            state: SearchState::with_hash_level(hash_level),
            book: None,
            use_book: true,
            banned: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replace the position. Banned moves belong to the old position and
    /// are dropped.
    pub fn set_position(&mut self, board: Board) {
        self.board = board;
        self.banned.clear();
    }

    /// Exclude `moves` from the root of the next search only.
    pub fn ban_moves(&mut self, moves: Vec<MoveKey>) {
        debug!("banned moves: {moves:?}");
        self.banned = moves;
    }

    #[must_use]
    pub fn banned(&self) -> &[MoveKey] {
        &self.banned
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SearchState {
        &mut self.state
    }

    /// Statistics of the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.state.stats
    }

    pub fn set_book(&mut self, book: Option<OpeningBook>) {
        self.book = book;
    }

    /// Load the opening book at `path`. On failure the previous book is
    /// kept and the search simply runs without new book moves.
    ///
    /// # Errors
    /// Returns the I/O error from reading the file.
    pub fn load_book(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        match OpeningBook::open(path.as_ref()) {
            Ok(book) => {
                self.book = Some(book);
                Ok(())
            }
            Err(e) => {
                warn!("cannot read opening book {}: {e}", path.as_ref().display());
                Err(e)
            }
        }
    }

    pub fn set_use_book(&mut self, use_book: bool) {
        self.use_book = use_book;
    }

    /// Make book picks reproducible.
    pub fn seed_book_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Choose a move: a book move if one applies, otherwise an
    /// iterative-deepening search of at most `max_depth` plies and about
    /// `max_time_secs` seconds.
    ///
    /// A zero budget is already spent once depth 1 completes, so the search
    /// stops there. Use [`SearchEngine::search_with`] for an unlimited one.
    ///
    /// # Errors
    /// Returns [`SearchError::MissingKing`] if either king is off the board.
    pub fn search_main(
        &mut self,
        max_depth: u32,
        max_time_secs: u64,
    ) -> Result<SearchResult, SearchError> {
        let max_depth = if max_time_secs == 0 { 1 } else { max_depth };
        let config = SearchConfig::depth(max_depth).with_time(max_time_secs * 1000);
        self.search_with(config, &AtomicBool::new(false))
    }

    /// [`SearchEngine::search_main`] with a full configuration and an
    /// external stop flag. Banned moves are merged into `config`.
    ///
    /// # Errors
    /// Returns [`SearchError::MissingKing`] if either king is off the board.
    pub fn search_with(
        &mut self,
        mut config: SearchConfig,
        stop: &AtomicBool,
    ) -> Result<SearchResult, SearchError> {
        for team in Team::ALL {
            if !self.board.has_king(team) {
                return Err(SearchError::MissingKing(team));
            }
        }
        let banned = std::mem::take(&mut self.banned);

        if let Some(mv) = self.book_move(&banned) {
            debug!("book move {mv}");
            return Ok(SearchResult {
                best_move: Some(mv),
                score: 0,
                depth: 0,
                from_book: true,
            });
        }

        config.banned.extend(banned);
        search(&mut self.board, &mut self.state, config, stop)
    }

    fn book_move(&mut self, banned: &[MoveKey]) -> Option<Move> {
        if !self.use_book {
            return None;
        }
        let book = self.book.as_ref()?;
        let mv = book.probe(&mut self.board, &mut self.rng)?;
        (!banned.contains(&mv.key())).then_some(mv)
    }
}
