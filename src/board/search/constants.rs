//! Search constants.
//!
//! Score scale and depth limits shared by every node type.

// ============================================================================
// SCORES
// ============================================================================

/// Value of a won position at the root. Mate scores are offset by distance.
pub const INF: i32 = 1_000_000;

/// Scores with absolute value >= this are forced results (mate, perpetual).
pub const BAN: i32 = INF - 2000;

/// Value of a drawn or bare repeated position.
pub const DRAW_VALUE: i32 = 0;

// ============================================================================
// SEARCH LIMITS
// ============================================================================

/// Plies the quiescence search may add below the nominal horizon.
pub const QUIESCENCE_EXTEND_DEPTH: i32 = 64;

/// Cap on the remaining quiescence plies once a side is in check.
pub const QUIESCENCE_CHECK_EXTEND_DEPTH: i32 = 8;

/// Deepest nominal iteration the driver will start.
pub const MAX_SEARCH_DEPTH: u32 = 64;

// ============================================================================
// HISTORY
// ============================================================================

/// History entries stop growing at this value.
pub const HISTORY_LIMIT: i32 = 1 << 24;

/// Killer slots kept per ply.
pub const KILLER_SLOTS: usize = 2;
