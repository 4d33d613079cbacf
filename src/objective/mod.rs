//! The capacitated local-search objective.
//!
//! [`Objective`] owns the travel-cost matrices and the [`Capacity`] and
//! edits a [`Solution`] through relocate and exchange moves. Every move runs
//! in three phases:
//!
//! 1. **Cheap reject** on the working matrix, which carries the Guided VNS
//!    penalties, against the operator's tolerance
//! 2. **Feasibility probe** on true costs for both routes, pricing the
//!    depot detour by a worst-case estimate and simulating it exactly only
//!    when the estimate fails
//! 3. **Commit**: structural edit, exact depot refresh, incremental
//!    [`Content`] update
//!
//! `try_*` operators report "no move" as `Ok(false)`; errors are contract
//! violations.
//!
//! # Examples
//!
//! ```
//! use u_cvrp::capacity::Capacity;
//! use u_cvrp::distance::DistanceMatrix;
//! use u_cvrp::objective::{seed, Objective};
//! use u_cvrp::solution::Solution;
//!
//! let dm = DistanceMatrix::from_rows(&[
//!     vec![0.0, 1.0, 9.0, 9.0],
//!     vec![1.0, 0.0, 9.0, 9.0],
//!     vec![9.0, 9.0, 0.0, 1.0],
//!     vec![9.0, 9.0, 1.0, 0.0],
//! ])
//! .unwrap();
//! let objective = Objective::new(dm, Capacity::new(5.0));
//! let mut solution = Solution::new();
//! let opened = objective
//!     .construct(&mut solution, &[0, 1, 2, 3], seed::first_remaining)
//!     .unwrap();
//! assert_eq!(opened, 2);
//! assert!((objective.total_cost(&solution) - 4.0).abs() < 1e-10);
//! ```

mod config;
mod construct;
mod moves;
mod penalty;
mod probe;
pub mod seed;
mod search;
mod sequence;

pub use config::ObjectiveConfig;
pub use penalty::{Penalties, Penalty};

use crate::capacity::{Capacity, Content};
use crate::distance::DistanceMatrix;
use crate::error::ObjectiveError;
use crate::solution::{DepotPlacement, Solution};
use crate::tour::{RouteId, Tour, TourKind, TourRef};

/// Relocate/exchange local search over a [`Solution`].
#[derive(Debug)]
pub struct Objective {
    base: DistanceMatrix,
    working: DistanceMatrix,
    fixed_costs: Vec<f64>,
    capacity: Capacity,
    depot: Option<Box<dyn DepotPlacement>>,
    config: ObjectiveConfig,
    penalties: Penalties,
}

impl Objective {
    /// Creates an objective over `matrix` with the given vehicle budget.
    pub fn new(matrix: DistanceMatrix, capacity: Capacity) -> Self {
        Self {
            working: matrix.clone(),
            base: matrix,
            fixed_costs: Vec::new(),
            capacity,
            depot: None,
            config: ObjectiveConfig::default(),
            penalties: Penalties::default(),
        }
    }

    /// Adds a fixed cost per visit, charged to the route serving it.
    pub fn with_fixed_costs(mut self, fixed_costs: Vec<f64>) -> Self {
        self.fixed_costs = fixed_costs;
        self
    }

    /// Makes every route pay a depot detour chosen by `placement`.
    pub fn with_depot(mut self, placement: impl DepotPlacement + 'static) -> Self {
        self.depot = Some(Box::new(placement));
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ObjectiveConfig) -> Self {
        self.config = config;
        self
    }

    /// True travel costs.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.base
    }

    /// Travel costs including the current penalties.
    pub fn working_matrix(&self) -> &DistanceMatrix {
        &self.working
    }

    /// The vehicle budget.
    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    /// The configuration.
    pub fn config(&self) -> &ObjectiveConfig {
        &self.config
    }

    /// Penalties currently applied to the working matrix.
    pub fn penalties(&self) -> &Penalties {
        &self.penalties
    }

    /// Fixed cost of serving `v` (zero when none was given).
    pub fn fixed_cost(&self, v: usize) -> f64 {
        self.fixed_costs.get(v).copied().unwrap_or(0.0)
    }

    /// True cost of a route: its edges plus its fixed visit costs, without
    /// the depot detour.
    pub fn tour_weight(&self, tour: TourRef<'_>) -> f64 {
        let travel: f64 = tour.pairs().map(|[a, b]| self.base.get(a, b)).sum();
        let fixed: f64 = tour.visits().map(|v| self.fixed_cost(v)).sum();
        travel + fixed
    }

    /// Sum of the route weights held by the contents.
    pub fn total_cost(&self, solution: &Solution) -> f64 {
        solution.total_weight()
    }

    /// Opens a route at `first` and prices it.
    ///
    /// `last` follows [`MultiTour::add`](crate::tour::MultiTour::add).
    ///
    /// The route is priced before it is added, so on error the solution is
    /// left as it was.
    pub fn new_route(
        &self,
        solution: &mut Solution,
        first: usize,
        last: Option<usize>,
    ) -> Result<RouteId, ObjectiveError> {
        let visits = match last {
            Some(l) if l != first => vec![first, l],
            _ => vec![first],
        };
        let tour = Tour::new(&visits, last)?;
        let slot = self.depot.as_deref().map(|p| p.place(tour.view(), &self.base));
        let weight = self.tour_weight(tour.view()) + slot.map_or(0.0, |s| s.cost);
        let mut content = self.capacity.empty_content();
        self.capacity.update_costs(&mut content, &visits, weight)?;
        let id = solution.add_route(first, last, content)?;
        solution.set_depot(id, slot);
        Ok(id)
    }

    /// Recomputes every route's depot slot and content from scratch.
    pub fn refresh(&self, solution: &mut Solution) -> Result<(), ObjectiveError> {
        solution.check_aligned()?;
        let ids: Vec<RouteId> = solution.tours().route_ids().collect();
        for id in ids {
            self.refresh_route(solution, id)?;
        }
        Ok(())
    }

    /// Recomputes one route's depot slot and content from scratch.
    pub fn refresh_route(&self, solution: &mut Solution, id: RouteId) -> Result<(), ObjectiveError> {
        solution.tours().check(id)?;
        if let Some(placement) = self.depot.as_deref() {
            solution.update_depot_position(id, placement, &self.base);
        }
        let detour = solution.depot(id).map_or(0.0, |s| s.cost);
        let tour = solution.tour(id);
        let weight = self.tour_weight(tour) + detour;
        let visits = tour.to_vec();
        self.capacity
            .update_costs(solution.content_mut(id), &visits, weight)?;
        Ok(())
    }

    /// Content the route would have if recomputed now; the solution is not
    /// touched.
    pub fn recompute_content(&self, solution: &Solution, id: RouteId) -> Result<Content, ObjectiveError> {
        solution.tours().check(id)?;
        let tour = solution.tour(id);
        let detour = match self.depot.as_deref() {
            Some(placement) => placement.place(tour, &self.base).cost,
            None => 0.0,
        };
        let mut content = self.capacity.empty_content();
        self.capacity
            .update_costs(&mut content, &tour.to_vec(), self.tour_weight(tour) + detour)?;
        Ok(content)
    }

    fn check_routes(&self, solution: &Solution, routes: &[RouteId]) -> Result<(), ObjectiveError> {
        solution.check_aligned()?;
        for &id in routes {
            solution.tours().check(id)?;
        }
        Ok(())
    }
}

/// Cost of linking `first..=last` in after `at` and before `to`; `to` is
/// `None` past an open route's terminal.
fn insertion_cost(m: &DistanceMatrix, at: usize, to: Option<usize>, first: usize, last: usize) -> f64 {
    m.get(at, first) + to.map_or(0.0, |b| m.get(last, b) - m.get(at, b))
}

/// Places where a visit or run can be linked in: every edge, plus the end
/// of an open route.
fn insertion_slots(tour: TourRef<'_>) -> Vec<(usize, Option<usize>)> {
    let mut slots: Vec<(usize, Option<usize>)> = tour.pairs().map(|[a, b]| (a, Some(b))).collect();
    if tour.kind() == TourKind::Open {
        slots.push((tour.last(), None));
    }
    slots
}

/// Returns `true` if `window` is consecutive on `tour`.
fn is_window(tour: TourRef<'_>, window: &[usize]) -> bool {
    window.windows(2).all(|e| tour.next_of(e[0]) == Some(e[1]))
        && window.first().is_some_and(|&v| tour.contains(v))
}

/// Splices `run` into a visit list directly after `at`.
fn insert_after_in(visits: &mut Vec<usize>, at: usize, run: &[usize]) {
    let pos = visits
        .iter()
        .position(|&x| x == at)
        .map_or(visits.len(), |p| p + 1);
    visits.splice(pos..pos, run.iter().copied());
}
