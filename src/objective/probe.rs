//! Feasibility probing and depot settling shared by all moves.

use super::Objective;
use crate::capacity::Content;
use crate::error::ObjectiveError;
use crate::solution::{DepotPlacement, Solution};
use crate::tour::RouteId;

/// One route's side of a candidate move, on true costs.
#[derive(Debug)]
pub(super) struct Change<'a> {
    pub route: RouteId,
    /// Weight change from travel and fixed costs, depot excluded.
    pub travel: f64,
    pub leaving: &'a [usize],
    pub broken: &'a [(usize, usize)],
    pub created: &'a [(usize, usize)],
}

impl Objective {
    /// Upper bound on the route's detour cost after the change: the cached
    /// slot if its edge survives, or the cheapest detour on a new edge.
    ///
    /// Both are placements that exist on the edited route, so the exact
    /// cost can only be lower.
    pub(super) fn depot_estimate(
        &self,
        placement: &dyn DepotPlacement,
        solution: &Solution,
        change: &Change<'_>,
    ) -> Option<f64> {
        let tour = solution.tour(change.route);
        let cached = solution.depot(change.route).and_then(|slot| {
            let next = tour.next_of(slot.point)?;
            let survives = !change.leaving.contains(&slot.point)
                && !change.leaving.contains(&next)
                && !change.broken.contains(&(slot.point, next));
            survives.then_some(slot.cost)
        });
        change
            .created
            .iter()
            .map(|&(a, b)| placement.detour(a, b, &self.base))
            .chain(cached)
            .min_by(f64::total_cmp)
    }

    /// Checks one side of a move against the capacity.
    ///
    /// `admits` is the capacity predicate for the move given a weight
    /// delta; `edit` reshapes the route's visit list the way the move will,
    /// and is only run when the estimate alone is not enough.
    pub(super) fn admissible(
        &self,
        solution: &Solution,
        change: &Change<'_>,
        admits: impl Fn(&Content, f64) -> bool,
        edit: impl FnOnce(&mut Vec<usize>),
    ) -> Result<bool, ObjectiveError> {
        let content = solution.content(change.route);
        let Some(placement) = self.depot.as_deref() else {
            return Ok(admits(content, change.travel));
        };
        let current = solution.depot(change.route).map_or(0.0, |s| s.cost);
        if let Some(estimate) = self.depot_estimate(placement, solution, change) {
            if admits(content, change.travel + estimate - current) {
                return Ok(true);
            }
        }
        let exact = solution.simulate_depot_cost(change.route, placement, &self.base, edit)?;
        Ok(admits(content, change.travel + exact - current))
    }

    /// Re-places the detour of an edited route; returns its cost change.
    pub(super) fn settle_depot(&self, solution: &mut Solution, route: RouteId) -> f64 {
        match self.depot.as_deref() {
            Some(placement) => solution.update_depot_position(route, placement, &self.base),
            None => 0.0,
        }
    }
}
