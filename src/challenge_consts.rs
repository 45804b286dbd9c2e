// Limits and tuning constants of the cleaning challenge.

/// Largest grid side we support. Fixed-size per-cell arrays are sized with it.
pub const MAX_N: usize = 40;

/// Number of candidate states kept after each turn.
pub const BEAM_WIDTH: usize = 40;
/// Maximum number of turns explored before heading home.
pub const BEAM_DEPTH: usize = 10000;
/// Deepest search allowed. Turns are counted in a u16, and the way home can
/// add up to one move per cell after the search.
pub const MAX_BEAM_DEPTH: usize = u16::MAX as usize - MAX_N * MAX_N;

// Scoring bonuses. These were tuned against the judge's scoring, keep them
// exact or routes will differ from previously recorded outputs.
pub const FIRST_VISIT_BONUS: i64 = 100;
pub const REVISIT_BONUS: i64 = 10;
