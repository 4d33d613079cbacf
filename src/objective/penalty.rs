//! Guided VNS edge penalties.
//!
//! Penalties raise entries of the working matrix only. Contents and
//! feasibility are always priced on true costs, so penalizing never makes a
//! route's recorded weight stale.
//!
//! # Algorithm
//!
//! Each application picks the costliest edge of two routes that carries no
//! penalty yet and raises its working cost by `penalty_step` times its
//! original cost. The next local search then avoids that edge. Once the
//! cumulative increase exceeds `penalty_limit` times the first penalized
//! edge's cost, further applications are refused and the caller resets,
//! which writes every stored original back.
//!
//! # Complexity
//!
//! Apply: O(len) over both routes. Reset: O(penalized edges).
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its
//! application to the traveling salesman problem", *European Journal of
//! Operational Research* 113(2), 469-499.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::Objective;
use crate::error::ObjectiveError;
use crate::solution::Solution;
use crate::tour::RouteId;

/// Penalty record of one directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    /// Times the edge was penalized.
    pub count: u32,
    /// Working cost before the first penalty.
    pub original: f64,
}

/// All penalties currently applied, with running totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Penalties {
    edges: HashMap<(usize, usize), Penalty>,
    total: f64,
    first: Option<f64>,
}

impl Penalties {
    /// Record of edge `(a, b)`, if penalized.
    pub fn get(&self, a: usize, b: usize) -> Option<&Penalty> {
        self.edges.get(&(a, b))
    }

    /// Returns `true` if `(a, b)` carries a penalty.
    pub fn is_penalized(&self, a: usize, b: usize) -> bool {
        self.edges.contains_key(&(a, b))
    }

    /// Number of penalized edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no edge is penalized.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of all increments applied so far.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Original cost of the first edge penalized since the last reset.
    pub fn first_cost(&self) -> Option<f64> {
        self.first
    }
}

impl Objective {
    /// Penalizes the costliest edge of `r1` and `r2` that carries no
    /// penalty yet. Ties go to the edge seen first, walking `r1` before
    /// `r2`.
    ///
    /// Returns `Ok(false)` without penalizing once the cumulative penalty
    /// exceeds the configured multiple of the first penalized edge's cost,
    /// or when every edge is already penalized.
    pub fn apply_penalty(
        &mut self,
        solution: &Solution,
        r1: RouteId,
        r2: RouteId,
    ) -> Result<bool, ObjectiveError> {
        solution.tours().check(r1)?;
        solution.tours().check(r2)?;
        if let Some(first) = self.penalties.first {
            if self.penalties.total > self.config.penalty_limit * first {
                debug!(
                    "penalty limit reached: {:.4} > {} x {:.4}",
                    self.penalties.total, self.config.penalty_limit, first
                );
                return Ok(false);
            }
        }

        let routes = if r1 == r2 { vec![r1] } else { vec![r1, r2] };
        let mut worst: Option<((usize, usize), f64)> = None;
        for id in routes {
            for [a, b] in solution.tour(id).pairs() {
                if self.penalties.is_penalized(a, b) {
                    continue;
                }
                let cost = self.working.get(a, b);
                if worst.map_or(true, |(_, c)| cost > c) {
                    worst = Some(((a, b), cost));
                }
            }
        }
        let Some(((a, b), _)) = worst else {
            return Ok(false);
        };
        self.penalize_edge(a, b);
        Ok(true)
    }

    /// Raises the working cost of `(a, b)` by the penalty step times its
    /// original cost and returns the increment.
    pub fn penalize_edge(&mut self, a: usize, b: usize) -> f64 {
        let current = self.working.get(a, b);
        let entry = self.penalties.edges.entry((a, b)).or_insert(Penalty {
            count: 0,
            original: current,
        });
        entry.count += 1;
        let original = entry.original;
        let count = entry.count;
        let step = self.config.penalty_step * original;
        self.working.set(a, b, current + step);
        self.penalties.total += step;
        self.penalties.first.get_or_insert(original);
        debug!("penalized edge ({a}, {b}) x{count}: {current:.4} -> {:.4}", current + step);
        step
    }

    /// Restores every penalized edge to its original working cost.
    pub fn reset_penalty(&mut self) {
        for (&(a, b), penalty) in &self.penalties.edges {
            self.working.set(a, b, penalty.original);
        }
        if !self.penalties.is_empty() {
            debug!(
                "reset {} penalized edges (total {:.4})",
                self.penalties.len(),
                self.penalties.total
            );
        }
        self.penalties = Penalties::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::fixtures::{line, unit_load};
    use crate::objective::ObjectiveConfig;
    use crate::tour::Tour;

    fn setup() -> (Objective, Solution, RouteId, RouteId) {
        let objective = Objective::new(line(10), unit_load(10, 9.0));
        let mut solution = Solution::new();
        let a = solution
            .add_tour(&Tour::closed(&[0, 4, 1]).expect("valid"), objective.capacity().empty_content())
            .expect("valid");
        let b = solution
            .add_tour(&Tour::closed(&[6, 7]).expect("valid"), objective.capacity().empty_content())
            .expect("valid");
        objective.refresh(&mut solution).expect("aligned");
        (objective, solution, a, b)
    }

    #[test]
    fn test_penalizes_costliest_edge_first_seen() {
        let (mut objective, solution, a, b) = setup();
        assert!(objective.apply_penalty(&solution, a, b).expect("valid"));
        // 0->4 is the longest edge of either route.
        let penalty = objective.penalties().get(0, 4).expect("penalized");
        assert_eq!(penalty.count, 1);
        assert!((objective.working_matrix().get(0, 4) - 4.0 * 1.3).abs() < 1e-10);
        assert!((objective.matrix().get(0, 4) - 4.0).abs() < 1e-10);

        assert!(objective.apply_penalty(&solution, a, b).expect("valid"));
        assert!(objective.penalties().is_penalized(4, 1));
    }

    #[test]
    fn test_ties_go_to_first_route() {
        let mut objective = Objective::new(line(10), unit_load(10, 9.0));
        let mut solution = Solution::new();
        let a = objective.new_route(&mut solution, 0, Some(0)).expect("valid");
        let b = objective.new_route(&mut solution, 5, Some(5)).expect("valid");
        solution.tours_mut().tour_mut(a).insert_after(0, 2).expect("insert");
        solution.tours_mut().tour_mut(b).insert_after(5, 7).expect("insert");
        assert!(objective.apply_penalty(&solution, b, a).expect("valid"));
        assert!(objective.penalties().is_penalized(5, 7));
    }

    #[test]
    fn test_stops_at_limit() {
        let (objective, solution, a, b) = setup();
        let mut objective = objective.with_config(
            ObjectiveConfig::default()
                .with_penalty_step(1.0)
                .with_penalty_limit(1.5),
        );
        assert!(objective.apply_penalty(&solution, a, b).expect("valid"));
        assert!(objective.apply_penalty(&solution, a, b).expect("valid"));
        // Total 4 + 3 now exceeds 1.5 x 4.
        assert!(!objective.apply_penalty(&solution, a, b).expect("valid"));
        assert_eq!(objective.penalties().len(), 2);
    }

    #[test]
    fn test_reset_restores_exact_weights() {
        let (mut objective, solution, a, b) = setup();
        let pristine = objective.working_matrix().clone();
        objective.penalize_edge(6, 7);
        for _ in 0..4 {
            objective.apply_penalty(&solution, a, b).expect("valid");
        }
        objective.penalize_edge(6, 7);
        objective.penalize_edge(0, 4);
        assert_eq!(objective.penalties().get(6, 7).map(|p| p.count), Some(2));
        objective.reset_penalty();
        assert_eq!(objective.working_matrix(), &pristine);
        assert!(objective.penalties().is_empty());
        assert_eq!(objective.penalties().first_cost(), None);
    }

    #[test]
    fn test_all_edges_penalized() {
        let mut objective = Objective::new(line(3), unit_load(3, 3.0))
            .with_config(ObjectiveConfig::default().with_penalty_limit(100.0));
        let mut solution = Solution::new();
        let id = objective.new_route(&mut solution, 0, Some(0)).expect("valid");
        assert!(objective.apply_penalty(&solution, id, id).expect("valid"));
        assert!(!objective.apply_penalty(&solution, id, id).expect("valid"));
    }
}
