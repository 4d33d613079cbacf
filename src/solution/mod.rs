//! The mutable state local search works on.
//!
//! A [`Solution`] is a [`MultiTour`] plus one [`Content`] and one cached
//! [`DepotSlot`] per route, index-aligned with the route handles.

mod depot;

pub use depot::{CheapestDetour, DepotPlacement, DepotSlot};

use crate::capacity::Content;
use crate::distance::DistanceMatrix;
use crate::error::{ObjectiveError, TourError};
use crate::tour::{MultiTour, RouteId, Tour, TourKind, TourRef};

/// Routes with their resource usage.
///
/// `Clone` deep-copies the successor array, the contents and the depot
/// cache, so alternatives can be explored without touching the incumbent.
///
/// # Examples
///
/// ```
/// use u_cvrp::capacity::Content;
/// use u_cvrp::solution::Solution;
/// use u_cvrp::tour::Tour;
///
/// let mut solution = Solution::new();
/// let id = solution
///     .add_tour(&Tour::closed(&[0, 1, 2]).unwrap(), Content::default())
///     .unwrap();
/// assert_eq!(solution.len(), 1);
/// assert_eq!(solution.tour(id).to_vec(), vec![0, 1, 2]);
///
/// let copy = solution.clone();
/// assert_eq!(copy, solution);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    tours: MultiTour,
    contents: Vec<Content>,
    depots: Vec<Option<DepotSlot>>,
}

impl Solution {
    /// Creates a solution without routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing routes and their contents.
    pub fn from_parts(tours: MultiTour, contents: Vec<Content>) -> Result<Self, ObjectiveError> {
        if tours.len() != contents.len() {
            return Err(ObjectiveError::CountMismatch {
                contents: contents.len(),
                tours: tours.len(),
            });
        }
        let depots = vec![None; tours.len()];
        Ok(Self {
            tours,
            contents,
            depots,
        })
    }

    /// Starts a route at `first` (see [`MultiTour::add`]).
    pub fn add_route(
        &mut self,
        first: usize,
        last: Option<usize>,
        content: Content,
    ) -> Result<RouteId, TourError> {
        let id = self.tours.add(first, last)?;
        self.contents.push(content);
        self.depots.push(None);
        Ok(id)
    }

    /// Copies `tour` in as a new route.
    pub fn add_tour(&mut self, tour: &Tour, content: Content) -> Result<RouteId, TourError> {
        let id = self.tours.add_tour(tour)?;
        self.contents.push(content);
        self.depots.push(None);
        Ok(id)
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.tours.len()
    }

    /// Returns `true` if there are no routes.
    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// The routes.
    pub fn tours(&self) -> &MultiTour {
        &self.tours
    }

    /// Read-only view of one route.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this solution.
    pub fn tour(&self, id: RouteId) -> TourRef<'_> {
        self.tours.tour(id)
    }

    /// Per-route contents, aligned with [`MultiTour::route_ids`].
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// Content of one route.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this solution.
    pub fn content(&self, id: RouteId) -> &Content {
        &self.contents[id.index()]
    }

    /// Cached depot detour of one route, if one has been placed.
    pub fn depot(&self, id: RouteId) -> Option<DepotSlot> {
        self.depots.get(id.index()).copied().flatten()
    }

    /// Sum of the route weights.
    pub fn total_weight(&self) -> f64 {
        self.contents.iter().map(Content::weight).sum()
    }

    pub(crate) fn tours_mut(&mut self) -> &mut MultiTour {
        &mut self.tours
    }

    pub(crate) fn content_mut(&mut self, id: RouteId) -> &mut Content {
        &mut self.contents[id.index()]
    }

    pub(crate) fn set_depot(&mut self, id: RouteId, slot: Option<DepotSlot>) {
        self.depots[id.index()] = slot;
    }

    /// Fails unless there is exactly one content and one depot entry per
    /// route.
    pub fn check_aligned(&self) -> Result<(), ObjectiveError> {
        if self.contents.len() != self.tours.len() || self.depots.len() != self.tours.len() {
            return Err(ObjectiveError::CountMismatch {
                contents: self.contents.len(),
                tours: self.tours.len(),
            });
        }
        Ok(())
    }

    /// Re-places the depot detour of `id` on its current visits and caches
    /// it. Returns the change in detour cost; the route's content is left to
    /// the caller.
    pub fn update_depot_position(
        &mut self,
        id: RouteId,
        placement: &dyn DepotPlacement,
        matrix: &DistanceMatrix,
    ) -> f64 {
        let slot = placement.place(self.tours.tour(id), matrix);
        let old = self.depot(id).map_or(0.0, |s| s.cost);
        self.set_depot(id, Some(slot));
        slot.cost - old
    }

    /// Exact detour cost `id` would have after `edit` reshapes its visit
    /// sequence. The solution itself is not touched.
    ///
    /// Closed routes re-anchor at whatever visit `edit` leaves in front;
    /// fixed routes keep their pinned last visit.
    pub fn simulate_depot_cost(
        &self,
        id: RouteId,
        placement: &dyn DepotPlacement,
        matrix: &DistanceMatrix,
        edit: impl FnOnce(&mut Vec<usize>),
    ) -> Result<f64, TourError> {
        let view = self.tours.get(id).ok_or(TourError::UnknownRoute(id.index()))?;
        let mut visits = view.to_vec();
        edit(&mut visits);
        let last = match view.kind() {
            TourKind::Open => None,
            TourKind::Closed => visits.first().copied(),
            TourKind::Fixed(l) => Some(l),
        };
        let tour = Tour::new(&visits, last)?;
        Ok(placement.place(tour.view(), matrix).cost)
    }
}
