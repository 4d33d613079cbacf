//! First-improvement descent over all operators.

use log::{debug, warn};

use super::Objective;
use crate::error::ObjectiveError;
use crate::solution::Solution;
use crate::tour::RouteId;

impl Objective {
    /// Applies improving moves until none is accepted.
    ///
    /// For every ordered pair of routes, tries in turn single-visit
    /// relocation (including within one route), single-visit exchange, run
    /// relocation and run exchange, restarting the pair after each accepted
    /// move. Stops early after the configured move budget. Returns the
    /// number of accepted moves.
    pub fn local_search(&self, solution: &mut Solution) -> Result<usize, ObjectiveError> {
        solution.check_aligned()?;
        let routes: Vec<RouteId> = solution.tours().route_ids().collect();
        let mut accepted = 0;
        loop {
            let before = accepted;
            for &r1 in &routes {
                for &r2 in &routes {
                    accepted += self.descend_pair(solution, r1, r2, accepted)?;
                    if accepted >= self.config.max_moves {
                        warn!("local search stopped at the move budget of {}", self.config.max_moves);
                        return Ok(accepted);
                    }
                }
            }
            if accepted == before {
                break;
            }
        }
        debug!(
            "local search: {accepted} moves, cost {:.4}",
            self.total_cost(solution)
        );
        Ok(accepted)
    }

    fn descend_pair(
        &self,
        solution: &mut Solution,
        r1: RouteId,
        r2: RouteId,
        spent: usize,
    ) -> Result<usize, ObjectiveError> {
        let mut accepted = 0;
        while spent + accepted < self.config.max_moves && self.improve_pair(solution, r1, r2)? {
            accepted += 1;
        }
        Ok(accepted)
    }

    /// Applies the first improving move between `r1` and `r2`, if any.
    fn improve_pair(&self, solution: &mut Solution, r1: RouteId, r2: RouteId) -> Result<bool, ObjectiveError> {
        let triples1: Vec<[usize; 3]> = solution.tour(r1).triples().collect();
        for &t in &triples1 {
            if self.try_move(solution, r1, t, r2)? {
                return Ok(true);
            }
        }
        if r1 == r2 {
            return Ok(false);
        }

        let triples2: Vec<[usize; 3]> = solution.tour(r2).triples().collect();
        for &t1 in &triples1 {
            for &t2 in &triples2 {
                if self.try_swap(solution, r1, t1, r2, t2)? {
                    return Ok(true);
                }
            }
        }

        let (min, max) = (self.config.seq_min, self.config.seq_max);
        for seq in self.seq_and_smaller(solution, r1, min, max, self.config.prune_windows)? {
            if self.try_move_seq(solution, r1, &seq, r2)? {
                return Ok(true);
            }
        }

        let runs1 = self.seq_and_smaller(solution, r1, min, max, false)?;
        let runs2 = self.seq_and_smaller(solution, r2, min, max, false)?;
        for a in &runs1 {
            for b in &runs2 {
                if self.try_swap_seq(solution, r1, a, r2, b)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
