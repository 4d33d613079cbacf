//! Guided VNS execution engine.
//!
//! # Algorithm
//!
//! 1. Descend from the initial solution to a local optimum
//! 2. While rounds remain:
//!    a. **Penalize**: pick a random route pair and penalize its costliest
//!    unpenalized edge; past the penalty limit, lift all penalties instead
//!    b. **Local search** on the penalized working costs
//!    c. **Keep the best**: clone the solution if its true cost improved
//! 3. Lift all penalties and return the best solution

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::VnsConfig;
use crate::error::ObjectiveError;
use crate::objective::Objective;
use crate::solution::Solution;
use crate::tour::RouteId;

/// Result of a Guided VNS run.
#[derive(Debug, Clone)]
pub struct VnsResult {
    /// Best solution found.
    pub best: Solution,
    /// True cost of the best solution.
    pub best_cost: f64,
    /// Rounds executed.
    pub rounds: usize,
    /// Round at which the best solution was found (0 for the initial descent).
    pub best_round: usize,
    /// Best cost after each round.
    pub cost_history: Vec<f64>,
}

/// Guided VNS runner.
pub struct GuidedVns;

impl GuidedVns {
    /// Runs Guided VNS from `initial`.
    ///
    /// The objective's penalties are empty again when this returns `Ok`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_cvrp::capacity::Capacity;
    /// use u_cvrp::distance::DistanceMatrix;
    /// use u_cvrp::objective::{seed, Objective};
    /// use u_cvrp::solution::Solution;
    /// use u_cvrp::vns::{GuidedVns, VnsConfig};
    ///
    /// let mut dm = DistanceMatrix::new(6);
    /// for a in 0..6 {
    ///     for b in 0..6 {
    ///         dm.set(a, b, (a as f64 - b as f64).abs());
    ///     }
    /// }
    /// let mut objective = Objective::new(dm, Capacity::new(6.0));
    /// let mut initial = Solution::new();
    /// objective
    ///     .construct(&mut initial, &[0, 1, 2, 3, 4, 5], seed::first_remaining)
    ///     .unwrap();
    ///
    /// let config = VnsConfig::default().with_max_rounds(20).with_seed(7);
    /// let result = GuidedVns::run(&mut objective, initial, &config).unwrap();
    /// assert!(result.best_cost <= objective.total_cost(&result.best) + 1e-10);
    /// assert!(objective.penalties().is_empty());
    /// ```
    pub fn run(
        objective: &mut Objective,
        initial: Solution,
        config: &VnsConfig,
    ) -> Result<VnsResult, ObjectiveError> {
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(42));

        let mut current = initial;
        objective.local_search(&mut current)?;
        let mut best = current.clone();
        let mut best_cost = objective.total_cost(&best);
        let mut best_round = 0;

        let routes: Vec<RouteId> = current.tours().route_ids().collect();
        let mut cost_history = Vec::with_capacity(config.max_rounds);
        let mut no_improve = 0;
        let mut rounds = 0;

        if routes.is_empty() {
            return Ok(VnsResult {
                best,
                best_cost,
                rounds,
                best_round,
                cost_history,
            });
        }

        for round in 1..=config.max_rounds {
            let (r1, r2) = pick_pair(&routes, &mut rng);
            if !objective.apply_penalty(&current, r1, r2)? {
                objective.reset_penalty();
            }

            let moves = objective.local_search(&mut current)?;
            let cost = objective.total_cost(&current);
            debug!(
                "round {round}: routes ({}, {}), {moves} moves, cost {cost:.4}",
                r1.index(),
                r2.index()
            );

            if cost < best_cost - 1e-12 {
                best = current.clone();
                best_cost = cost;
                best_round = round;
                no_improve = 0;
            } else {
                no_improve += 1;
            }

            rounds = round;
            cost_history.push(best_cost);

            if no_improve >= config.max_no_improve {
                break;
            }
        }

        objective.reset_penalty();
        info!("guided VNS: best cost {best_cost:.4} at round {best_round} of {rounds}");

        Ok(VnsResult {
            best,
            best_cost,
            rounds,
            best_round,
            cost_history,
        })
    }
}

/// Two distinct routes when there are at least two.
fn pick_pair<R: Rng>(routes: &[RouteId], rng: &mut R) -> (RouteId, RouteId) {
    let n = routes.len();
    let i = rng.random_range(0..n);
    if n == 1 {
        return (routes[i], routes[i]);
    }
    let j = (i + rng.random_range(1..n)) % n;
    (routes[i], routes[j])
}
