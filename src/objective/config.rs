//! Local-search objective configuration.

use serde::{Deserialize, Serialize};

use crate::tolerance::{MOVE_EPSILON, PENALTY_LIMIT_FACTOR, SEQ_EPSILON, SWAP_EPSILON};

/// Tuning knobs of [`Objective`](super::Objective).
///
/// # Examples
///
/// ```
/// use u_cvrp::objective::ObjectiveConfig;
///
/// let config = ObjectiveConfig::default()
///     .with_window(2, 4)
///     .with_penalty_step(0.5);
/// assert_eq!(config.seq_max, 4);
/// assert_eq!(config.penalty_step, 0.5);
/// assert!(config.closed_routes);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveConfig {
    /// Minimum removal gain for relocating one visit.
    pub move_epsilon: f64,
    /// Minimum gain for exchanging two visits.
    pub swap_epsilon: f64,
    /// Minimum gain for relocating or exchanging runs.
    pub seq_epsilon: f64,
    /// Smallest run size tried by the sequence moves.
    pub seq_min: usize,
    /// Largest run size tried by the sequence moves.
    pub seq_max: usize,
    /// Fraction of an edge's original cost added per penalty.
    pub penalty_step: f64,
    /// Penalizing stops once the cumulative penalty exceeds this multiple
    /// of the first penalized edge's cost.
    pub penalty_limit: f64,
    /// Skip run relocations that cannot have a positive removal gain.
    pub prune_windows: bool,
    /// Whether construction opens closed routes (otherwise open ones).
    pub closed_routes: bool,
    /// Upper bound on moves accepted by one local search.
    pub max_moves: usize,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            move_epsilon: MOVE_EPSILON,
            swap_epsilon: SWAP_EPSILON,
            seq_epsilon: SEQ_EPSILON,
            seq_min: 2,
            seq_max: 3,
            penalty_step: 0.3,
            penalty_limit: PENALTY_LIMIT_FACTOR,
            prune_windows: true,
            closed_routes: true,
            max_moves: 100_000,
        }
    }
}

impl ObjectiveConfig {
    /// Sets the single-visit relocation and exchange tolerances.
    pub fn with_epsilons(mut self, move_epsilon: f64, swap_epsilon: f64) -> Self {
        self.move_epsilon = move_epsilon;
        self.swap_epsilon = swap_epsilon;
        self
    }

    /// Sets the run-move tolerance.
    pub fn with_seq_epsilon(mut self, epsilon: f64) -> Self {
        self.seq_epsilon = epsilon;
        self
    }

    /// Sets the run sizes tried by the sequence moves.
    pub fn with_window(mut self, min: usize, max: usize) -> Self {
        self.seq_min = min;
        self.seq_max = max;
        self
    }

    /// Sets the per-penalty increment as a fraction of the edge cost.
    pub fn with_penalty_step(mut self, step: f64) -> Self {
        self.penalty_step = step;
        self
    }

    /// Sets the cumulative penalty cap factor.
    pub fn with_penalty_limit(mut self, factor: f64) -> Self {
        self.penalty_limit = factor;
        self
    }

    /// Enables or disables window pruning.
    pub fn with_prune_windows(mut self, prune: bool) -> Self {
        self.prune_windows = prune;
        self
    }

    /// Chooses closed (`true`) or open routes for construction.
    pub fn with_closed_routes(mut self, closed: bool) -> Self {
        self.closed_routes = closed;
        self
    }

    /// Sets the move budget of one local search.
    pub fn with_max_moves(mut self, n: usize) -> Self {
        self.max_moves = n;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_named_tolerances() {
        let config = ObjectiveConfig::default();
        assert_eq!(config.move_epsilon, MOVE_EPSILON);
        assert_eq!(config.seq_epsilon, SEQ_EPSILON);
        assert_eq!(config.penalty_limit, PENALTY_LIMIT_FACTOR);
    }

    #[test]
    fn test_partial_json() {
        let config: ObjectiveConfig =
            serde_json::from_str(r#"{"seq_max": 5, "closed_routes": false}"#).expect("valid");
        assert_eq!(config.seq_max, 5);
        assert!(!config.closed_routes);
        assert_eq!(config.seq_min, 2);
    }
}
