//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with best-move-first root re-ordering
//! - Principal-variation search with separate PV and null-window (cut) nodes
//! - Null move pruning with verification and multi-prob-cut
//! - Internal iterative deepening when no hash move is known
//! - Quiescence search with stand-pat and check extension
//! - Move ordering (TT move, killers, captures, history)
//! - Mate distance pruning and repetition (perpetual check / chase) scoring

mod alphabeta;
mod constants;
mod move_order;
mod params;

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::tt::{TranspositionTable, DEFAULT_HASH_LEVEL};

use super::eval::StaticEvaluator;
use super::{Board, Move, MoveKey, Team, BOARD_POINTS, MAX_PLY};
pub use alphabeta::{detect_repetition, Repetition};
pub use constants::{BAN, DRAW_VALUE, INF, MAX_SEARCH_DEPTH};
pub use params::SearchParams;

/// Outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// The best move found, `None` when the side to move has no legal move.
    pub best_move: Option<Move>,
    /// Value of `best_move` from the mover's point of view.
    pub score: i32,
    /// Deepest completed iteration (0 for book moves and dead positions).
    pub depth: u32,
    /// Whether the move came from the opening book.
    pub from_book: bool,
}

/// Errors that prevent a search from starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// One side has no king on the board.
    MissingKing(Team),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::MissingKing(team) => write!(f, "{team} king is missing"),
        }
    }
}

impl std::error::Error for SearchError {}

/// Statistics tracked during search
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub depth: u32,
    pub tt_hits: u64,
    pub elapsed_ms: u64,
    /// Value of every root move in the last completed iteration.
    pub root_values: Vec<(MoveKey, i32)>,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = SearchStats::default();
    }
}

/// Recent quiet moves that caused cutoffs, per distance from the root.
pub struct KillerTable {
    slots: [[Option<MoveKey>; constants::KILLER_SLOTS]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[None; constants::KILLER_SLOTS]; MAX_PLY],
        }
    }

    /// Killers at `ply`, most recent first.
    #[must_use]
    pub fn killers(&self, ply: usize) -> [Option<MoveKey>; constants::KILLER_SLOTS] {
        self.slots
            .get(ply)
            .copied()
            .unwrap_or([None; constants::KILLER_SLOTS])
    }

    pub fn update(&mut self, ply: usize, key: MoveKey) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != Some(key) {
            row[1] = row[0];
            row[0] = Some(key);
        }
    }

    pub fn reset(&mut self) {
        for row in &mut self.slots {
            *row = [None; constants::KILLER_SLOTS];
        }
    }
}

/// History heuristic indexed by side, origin and destination point.
pub struct HistoryTable {
    entries: Box<[[[i32; BOARD_POINTS]; BOARD_POINTS]; 2]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: Box::new([[[0; BOARD_POINTS]; BOARD_POINTS]; 2]),
        }
    }

    #[must_use]
    pub fn score(&self, team: Team, key: MoveKey) -> i32 {
        self.entries[team.index()][key.from.index()][key.to.index()]
    }

    /// Reward a move that was best or cut off at `depth`.
    pub fn update(&mut self, team: Team, key: MoveKey, depth: i32) {
        let bonus = depth.max(0) * depth.max(0);
        let entry = &mut self.entries[team.index()][key.from.index()][key.to.index()];
        *entry = entry.saturating_add(bonus).min(constants::HISTORY_LIMIT);
    }

    pub fn reset(&mut self) {
        for side in self.entries.iter_mut() {
            for row in side.iter_mut() {
                row.fill(0);
            }
        }
    }
}

/// Tables used during search (TT, killers, history)
pub struct SearchTables {
    pub tt: TranspositionTable,
    pub killers: KillerTable,
    pub history: HistoryTable,
}

impl SearchTables {
    /// Forget everything learned by the previous search.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.killers.reset();
        self.history.reset();
    }
}

/// Search state persisted across searches
pub struct SearchState {
    pub stats: SearchStats,
    pub tables: SearchTables,
    pub params: SearchParams,
    /// Replaces the board's incremental evaluation at leaves when set.
    pub evaluator: Option<Arc<dyn StaticEvaluator>>,
}

impl SearchState {
    /// State with a transposition table of roughly `tt_mb` megabytes.
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        Self::with_table(TranspositionTable::new(tt_mb))
    }

    /// State with a transposition table of `2^hash_level` buckets.
    #[must_use]
    pub fn with_hash_level(hash_level: u32) -> Self {
        Self::with_table(TranspositionTable::with_hash_level(hash_level))
    }

    fn with_table(tt: TranspositionTable) -> Self {
        SearchState {
            stats: SearchStats::default(),
            tables: SearchTables {
                tt,
                killers: KillerTable::new(),
                history: HistoryTable::new(),
            },
            params: SearchParams::default(),
            evaluator: None,
        }
    }

    pub fn params_mut(&mut self) -> &mut SearchParams {
        &mut self.params
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SearchParams) {
        self.params = params;
    }

    pub fn set_evaluator(&mut self, evaluator: Option<Arc<dyn StaticEvaluator>>) {
        self.evaluator = evaluator;
    }

    /// Replace the transposition table with one of roughly `tt_mb` megabytes.
    pub fn reset_tables(&mut self, tt_mb: usize) {
        self.tables.tt = TranspositionTable::new(tt_mb);
        self.stats.reset();
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tables.tt.hashfull_per_mille()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::with_hash_level(DEFAULT_HASH_LEVEL)
    }
}

// ============================================================================
// SEARCH API
// ============================================================================

/// Configuration for a search operation.
#[derive(Clone, Default)]
pub struct SearchConfig {
    /// Maximum depth to search (None = `MAX_SEARCH_DEPTH`)
    pub max_depth: Option<u32>,
    /// Time budget in milliseconds (0 = unlimited)
    pub time_limit_ms: u64,
    /// Root moves that must not be chosen.
    pub banned: Vec<MoveKey>,
    /// Optional callback for iteration info
    pub info_callback: Option<SearchInfoCallback>,
}

impl SearchConfig {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Create a time-limited search config
    #[must_use]
    pub fn time(time_limit_ms: u64) -> Self {
        SearchConfig {
            time_limit_ms,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_time(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    #[must_use]
    pub fn with_banned(mut self, banned: Vec<MoveKey>) -> Self {
        self.banned = banned;
        self
    }

    /// Attach a callback for iteration info reporting.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub score: i32,
    pub best_move: MoveKey,
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Run an iterative-deepening search on `board`.
///
/// Learned tables are cleared first, so the result depends only on the
/// position, its move history and `config`. `stop` is polled between root
/// moves once the first iteration has finished.
///
/// # Errors
/// Returns [`SearchError::MissingKing`] if either king is off the board.
///
/// # Example
/// ```
/// use std::sync::atomic::AtomicBool;
/// use xiangqi_engine::board::{search, Board, SearchConfig, SearchState};
///
/// let mut board = Board::new();
/// let mut state = SearchState::with_hash_level(16);
/// let result = search(&mut board, &mut state, SearchConfig::depth(2), &AtomicBool::new(false))
///     .expect("both kings present");
/// assert!(result.best_move.is_some());
/// ```
#[allow(clippy::needless_pass_by_value)] // Config is intentionally consumed
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    config: SearchConfig,
    stop: &AtomicBool,
) -> Result<SearchResult, SearchError> {
    for team in Team::ALL {
        if !board.has_king(team) {
            return Err(SearchError::MissingKing(team));
        }
    }

    state.tables.reset();
    state.stats.reset();
    board.reset_distance();

    let max_depth = config
        .max_depth
        .unwrap_or(MAX_SEARCH_DEPTH)
        .clamp(1, MAX_SEARCH_DEPTH);
    let start_time = Instant::now();
    let mut ctx = alphabeta::SearchContext {
        board,
        state,
        stop,
        start_time,
        time_limit_ms: config.time_limit_ms,
        nodes: 0,
        completed_depth: 0,
        root_moves: Vec::new(),
        info_callback: config.info_callback.clone(),
    };
    let result = ctx.iterative_deepening(max_depth, &config.banned);
    let nodes = ctx.nodes;

    state.stats.nodes = nodes;
    state.stats.elapsed_ms = start_time.elapsed().as_millis() as u64;
    Ok(result)
}
