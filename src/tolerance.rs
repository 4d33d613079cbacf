//! Named numeric tolerances.
//!
//! Each local-search operator rejects a move unless its gain clears the
//! operator's epsilon; [`ObjectiveConfig`](crate::objective::ObjectiveConfig)
//! starts from these values.

/// Minimum removal gain for relocating a single visit.
pub const MOVE_EPSILON: f64 = 0.01;

/// Minimum gain for exchanging two single visits.
pub const SWAP_EPSILON: f64 = 0.01;

/// Minimum gain for relocating or exchanging runs of visits.
pub const SEQ_EPSILON: f64 = 0.1;

/// Slack allowed on resource limits to absorb floating-point drift.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Guided VNS stops penalizing once the cumulative penalty exceeds this
/// multiple of the first penalized edge's cost.
pub const PENALTY_LIMIT_FACTOR: f64 = 5.0;
