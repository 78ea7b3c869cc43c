/// Tunable switches and coefficients for the alpha-beta search.
///
/// Disabling the selective techniques (`null_move`, `multi_prob_cut`) turns
/// the search into a plain principal-variation search, whose root value
/// matches exhaustive minimax to the same depth.
#[derive(Clone, Debug)]
pub struct SearchParams {
    pub null_move: bool,
    /// Extra plies removed from a null-move search beyond the passed turn.
    pub null_reduction: i32,
    /// Minimum major-piece weight of the side to move before a null move.
    pub null_okay_weight: i32,
    /// Above this weight a null-move cutoff is trusted without verification.
    pub null_safe_weight: i32,
    pub multi_prob_cut: bool,
    pub mpc_a: f64,
    pub mpc_b: f64,
    pub mpc_sigma: f64,
    pub mpc_t: f64,
    /// Scales `mpc_b` and `mpc_sigma` to the evaluation's pawn unit.
    pub mpc_scale: f64,
    pub mpc_min_depth: i32,
    pub internal_iterative: bool,
    pub iid_min_depth: i32,
    pub quiescence_extend: i32,
    pub quiescence_check_extend: i32,
    /// A new iteration starts only while elapsed < budget / divisor.
    pub iteration_time_divisor: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            null_move: true,
            null_reduction: 1,
            null_okay_weight: 6,
            null_safe_weight: 12,
            multi_prob_cut: true,
            mpc_a: 1.02,
            mpc_b: 2.36,
            mpc_sigma: 82.0,
            mpc_t: 1.5,
            mpc_scale: 0.3,
            mpc_min_depth: 4,
            internal_iterative: true,
            iid_min_depth: 2,
            quiescence_extend: super::constants::QUIESCENCE_EXTEND_DEPTH,
            quiescence_check_extend: super::constants::QUIESCENCE_CHECK_EXTEND_DEPTH,
            iteration_time_divisor: 3,
        }
    }
}

impl SearchParams {
    /// Plain principal-variation search: no null move, no probabilistic cuts.
    #[must_use]
    pub fn exhaustive() -> Self {
        SearchParams {
            null_move: false,
            multi_prob_cut: false,
            ..SearchParams::default()
        }
    }
}
