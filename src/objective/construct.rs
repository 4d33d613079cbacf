//! Greedy construction.

use std::collections::HashSet;

use log::{debug, trace, warn};

use super::probe::Change;
use super::{insert_after_in, insertion_cost, insertion_slots, Objective};
use crate::error::ObjectiveError;
use crate::solution::Solution;
use crate::tour::RouteId;

/// A priced insertion of one remaining visit.
#[derive(Debug, Clone, Copy)]
struct Insertion {
    route: RouteId,
    at: usize,
    to: Option<usize>,
    visit: usize,
    travel: f64,
}

impl Objective {
    /// Starts a route at a seed chosen by `select` among `remaining`, then
    /// fills it with [`try_place_in`](Self::try_place_in).
    ///
    /// The route is closed or open as configured. Returns `Ok(None)` when
    /// nothing remains.
    ///
    /// # Errors
    ///
    /// [`ObjectiveError::UnknownSeed`] if `select` returns a visit that is
    /// not in `remaining`; a capacity error if the seed alone breaks a
    /// constraint. Neither touches `solution` or `remaining`.
    pub fn seed_next(
        &self,
        solution: &mut Solution,
        remaining: &mut Vec<usize>,
        select: impl FnOnce(&[usize]) -> usize,
    ) -> Result<Option<RouteId>, ObjectiveError> {
        if remaining.is_empty() {
            return Ok(None);
        }
        let seed = select(remaining);
        let pos = remaining
            .iter()
            .position(|&v| v == seed)
            .ok_or(ObjectiveError::UnknownSeed(seed))?;
        let last = self.config.closed_routes.then_some(seed);
        let id = self.new_route(solution, seed, last)?;
        remaining.remove(pos);
        let weight = solution.content(id).weight();
        if !self.capacity.fits_weight(weight) {
            warn!("seed {seed} alone weighs {weight:.4}, above the limit {}", self.capacity.max());
        }
        let placed = self.try_place_in(solution, id, remaining)?;
        debug!("route {} seeded at {seed} with {placed} more visits", id.index());
        Ok(Some(id))
    }

    /// Repeatedly inserts the cheapest feasible remaining visit at its
    /// cheapest slot of `route` until none fits. Placed visits are taken
    /// out of `remaining`; returns how many.
    pub fn try_place_in(
        &self,
        solution: &mut Solution,
        route: RouteId,
        remaining: &mut Vec<usize>,
    ) -> Result<usize, ObjectiveError> {
        self.check_routes(solution, &[route])?;
        self.place_greedily(solution, &[route], remaining)
    }

    /// Like [`try_place_in`](Self::try_place_in), choosing among all routes
    /// at every step.
    pub fn try_place_any(
        &self,
        solution: &mut Solution,
        remaining: &mut Vec<usize>,
    ) -> Result<usize, ObjectiveError> {
        solution.check_aligned()?;
        let routes: Vec<RouteId> = solution.tours().route_ids().collect();
        self.place_greedily(solution, &routes, remaining)
    }

    /// Routes every visit of `visits` that is not routed yet: first into
    /// the existing routes, then into new routes seeded by `select`.
    /// Returns the number of routes opened.
    pub fn construct(
        &self,
        solution: &mut Solution,
        visits: &[usize],
        mut select: impl FnMut(&[usize]) -> usize,
    ) -> Result<usize, ObjectiveError> {
        let mut seen = HashSet::with_capacity(visits.len());
        let mut remaining: Vec<usize> = visits
            .iter()
            .copied()
            .filter(|&v| !solution.tours().is_placed(v) && seen.insert(v))
            .collect();
        let joined = self.try_place_any(solution, &mut remaining)?;
        let mut opened = 0;
        while self.seed_next(solution, &mut remaining, &mut select)?.is_some() {
            opened += 1;
        }
        debug!(
            "construction: {joined} visits joined existing routes, {opened} routes opened, cost {:.4}",
            self.total_cost(solution)
        );
        Ok(opened)
    }

    fn place_greedily(
        &self,
        solution: &mut Solution,
        routes: &[RouteId],
        remaining: &mut Vec<usize>,
    ) -> Result<usize, ObjectiveError> {
        let mut placed = 0;
        while let Some(choice) = self.cheapest_insertion(solution, routes, remaining)? {
            self.commit_insertion(solution, choice)?;
            remaining.retain(|&v| v != choice.visit);
            placed += 1;
        }
        Ok(placed)
    }

    /// Cheapest feasible insertion over `routes`, by true cost.
    fn cheapest_insertion(
        &self,
        solution: &Solution,
        routes: &[RouteId],
        remaining: &[usize],
    ) -> Result<Option<Insertion>, ObjectiveError> {
        let mut candidates = Vec::new();
        for &route in routes {
            for (at, to) in insertion_slots(solution.tour(route)) {
                for &visit in remaining {
                    let travel = insertion_cost(&self.base, at, to, visit, visit) + self.fixed_cost(visit);
                    candidates.push(Insertion {
                        route,
                        at,
                        to,
                        visit,
                        travel,
                    });
                }
            }
        }
        candidates.sort_by(|x, y| x.travel.total_cmp(&y.travel));

        for candidate in candidates {
            let Insertion { route, at, to, visit, travel } = candidate;
            let broken: Vec<(usize, usize)> = to.map(|b| (at, b)).into_iter().collect();
            let created: Vec<(usize, usize)> = std::iter::once((at, visit)).chain(to.map(|b| (visit, b))).collect();
            let change = Change {
                route,
                travel,
                leaving: &[],
                broken: &broken,
                created: &created,
            };
            let fits = self.admissible(
                solution,
                &change,
                |content, d| self.capacity.can_add(content, visit, d),
                |visits| insert_after_in(visits, at, &[visit]),
            )?;
            if fits {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    fn commit_insertion(&self, solution: &mut Solution, choice: Insertion) -> Result<(), ObjectiveError> {
        solution
            .tours_mut()
            .tour_mut(choice.route)
            .insert_after(choice.at, choice.visit)?;
        let detour = self.settle_depot(solution, choice.route);
        self.capacity
            .add(solution.content_mut(choice.route), choice.visit, choice.travel + detour)?;
        trace!(
            "placed {} after {} on route {}",
            choice.visit,
            choice.at,
            choice.route.index()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{Capacity, Constraint};
    use crate::error::CapacityError;
    use crate::objective::fixtures::{line, unit_load};
    use crate::objective::seed;
    use crate::objective::ObjectiveConfig;
    use crate::solution::CheapestDetour;

    #[test]
    fn test_construct_respects_load() {
        let objective = Objective::new(line(9), unit_load(9, 3.0));
        let mut solution = Solution::new();
        let opened = objective
            .construct(&mut solution, &(0..9).collect::<Vec<_>>(), seed::first_remaining)
            .expect("valid");
        assert_eq!(opened, 3);
        assert_eq!(solution.tours().num_visits(), 9);
        for id in solution.tours().route_ids() {
            assert_eq!(solution.content(id).quantities(), &[3.0]);
            let fresh = objective.recompute_content(&solution, id).expect("valid");
            assert!(fresh.approx_eq(solution.content(id), 1e-9));
        }
    }

    #[test]
    fn test_seed_next_unknown_seed() {
        let objective = Objective::new(line(4), unit_load(4, 3.0));
        let mut solution = Solution::new();
        let mut remaining = vec![1, 2];
        let err = objective
            .seed_next(&mut solution, &mut remaining, |_| 3)
            .expect_err("not remaining");
        assert_eq!(err, ObjectiveError::UnknownSeed(3));
        assert_eq!(remaining, vec![1, 2]);
        assert!(solution.is_empty());
    }

    #[test]
    fn test_oversized_seed_leaves_solution_untouched() {
        let capacity = Capacity::new(f64::INFINITY).with_constraint(Constraint::new("load", 2.0, vec![1.0, 1.0, 5.0]));
        let objective = Objective::new(line(3), capacity);
        let mut solution = Solution::new();
        let err = objective
            .construct(&mut solution, &[2, 0, 1], seed::first_remaining)
            .expect_err("seed 2 alone is over the load");
        assert!(matches!(
            err,
            ObjectiveError::Capacity(CapacityError::ConstraintViolated { .. })
        ));
        assert!(solution.is_empty());
        assert!(solution.contents().is_empty());

        let mut remaining = vec![2, 0];
        assert!(objective
            .seed_next(&mut solution, &mut remaining, seed::first_remaining)
            .is_err());
        assert_eq!(remaining, vec![2, 0]);
        assert!(solution.is_empty());
        solution.check_aligned().expect("aligned");
    }

    #[test]
    fn test_seed_next_empty() {
        let objective = Objective::new(line(4), unit_load(4, 3.0));
        let mut solution = Solution::new();
        let mut remaining = Vec::new();
        assert_eq!(
            objective
                .seed_next(&mut solution, &mut remaining, seed::first_remaining)
                .expect("valid"),
            None
        );
    }

    #[test]
    fn test_try_place_in_single_route() {
        let objective = Objective::new(line(6), unit_load(6, 9.0));
        let mut solution = Solution::new();
        let id = objective.new_route(&mut solution, 0, Some(0)).expect("valid");
        let mut remaining = vec![5, 2, 3];
        let placed = objective
            .try_place_in(&mut solution, id, &mut remaining)
            .expect("valid");
        assert_eq!(placed, 3);
        assert!(remaining.is_empty());
        assert!((solution.content(id).weight() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_try_place_any_prefers_cheapest_route() {
        let objective = Objective::new(line(10), unit_load(10, 9.0));
        let mut solution = Solution::new();
        let a = objective.new_route(&mut solution, 0, Some(0)).expect("valid");
        let b = objective.new_route(&mut solution, 9, Some(9)).expect("valid");
        let mut remaining = vec![1, 8];
        assert_eq!(objective.try_place_any(&mut solution, &mut remaining).expect("valid"), 2);
        assert_eq!(solution.tour(a).to_vec(), vec![0, 1]);
        assert_eq!(solution.tour(b).to_vec(), vec![9, 8]);
    }

    #[test]
    fn test_open_routes_and_weight_limit() {
        let objective = Objective::new(line(10), Capacity::new(4.0))
            .with_config(ObjectiveConfig::default().with_closed_routes(false));
        let mut solution = Solution::new();
        let opened = objective
            .construct(&mut solution, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], seed::first_remaining)
            .expect("valid");
        assert_eq!(opened, 2);
        for (_, tour) in solution.tours().tours() {
            assert_eq!(tour.kind(), crate::tour::TourKind::Open);
        }
        for content in solution.contents() {
            assert!(content.weight() <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn test_construct_with_depot() {
        let objective = Objective::new(line(9), Capacity::new(20.0)).with_depot(CheapestDetour::new(8));
        let mut solution = Solution::new();
        objective
            .construct(&mut solution, &[0, 1, 2, 3, 4, 5, 6, 7], seed::first_remaining)
            .expect("valid");
        assert_eq!(solution.tours().num_visits(), 8);
        for id in solution.tours().route_ids() {
            let fresh = objective.recompute_content(&solution, id).expect("valid");
            assert!(fresh.approx_eq(solution.content(id), 1e-9));
            assert!(solution.content(id).weight() <= 20.0 + 1e-9);
        }
    }
}
