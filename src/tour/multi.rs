//! Several routes sharing one successor array.

use serde::{Deserialize, Serialize};

use super::{link, slot_of, validate, Anchor, Tour, TourMut, TourRef, TourView, NOT_SET};
use crate::error::TourError;

/// Handle of a route inside a [`MultiTour`]: the index of its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteId(usize);

impl RouteId {
    #[cfg(test)]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the route in its multi-tour.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The boundary of a contiguous run inside a route: the visit before it,
/// its first and last visits, and the visit after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunEnds {
    /// Visit directly before the run.
    pub before: usize,
    /// First visit of the run.
    pub first: usize,
    /// Last visit of the run.
    pub last: usize,
    /// Visit directly after the run.
    pub after: usize,
}

/// Many routes over one successor array.
///
/// Visit sets of distinct routes are disjoint. `PartialEq` compares the
/// anchor list and the entire array, which makes it the canonical equality
/// for regression tests.
///
/// # Examples
///
/// ```
/// use u_cvrp::tour::{MultiTour, Tour};
///
/// let mut tours = MultiTour::new();
/// let a = tours.add_tour(&Tour::closed(&[0, 1, 2]).unwrap()).unwrap();
/// let b = tours.add(3, Some(3)).unwrap();
/// tours.tour_mut(b).insert_after(3, 4).unwrap();
/// assert_eq!(tours.tour(a).to_vec(), vec![0, 1, 2]);
/// assert_eq!(tours.tour(b).to_vec(), vec![3, 4]);
/// assert_eq!(tours.route_of(4), Some(b));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiTour {
    next: Vec<usize>,
    anchors: Vec<Anchor>,
}

impl MultiTour {
    /// Creates an empty multi-tour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty multi-tour with room for ids below `visits`.
    pub fn with_capacity(visits: usize) -> Self {
        Self {
            next: vec![NOT_SET; visits],
            anchors: Vec::new(),
        }
    }

    /// Starts a new route at `first`.
    ///
    /// `last = None` is open, `Some(first)` closed, and `Some(l)` pins `l`
    /// directly after `first`.
    pub fn add(&mut self, first: usize, last: Option<usize>) -> Result<RouteId, TourError> {
        let visits: Vec<usize> = match last {
            Some(l) if l != first => vec![first, l],
            _ => vec![first],
        };
        self.add_visits(&visits, last)
    }

    /// Copies `tour`'s visit sequence into the shared array as a new route.
    pub fn add_tour(&mut self, tour: &Tour) -> Result<RouteId, TourError> {
        let anchor = tour.anchor();
        self.place(&tour.to_vec(), anchor)
    }

    /// Adds a route over `visits`, with `last` as in [`Tour::new`].
    pub fn add_visits(&mut self, visits: &[usize], last: Option<usize>) -> Result<RouteId, TourError> {
        let anchor = validate(visits, last)?;
        self.place(visits, anchor)
    }

    fn place(&mut self, visits: &[usize], anchor: Anchor) -> Result<RouteId, TourError> {
        if let Some(&taken) = visits.iter().find(|&&v| self.is_placed(v)) {
            return Err(TourError::AlreadyPresent(taken));
        }
        link(&mut self.next, visits);
        self.anchors.push(anchor);
        Ok(RouteId(self.anchors.len() - 1))
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if there are no routes.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Route handles in creation order.
    pub fn route_ids(&self) -> impl Iterator<Item = RouteId> + '_ {
        (0..self.anchors.len()).map(RouteId)
    }

    /// The raw shared successor array.
    pub fn slots(&self) -> &[usize] {
        &self.next
    }

    /// Anchors in route order.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Returns `true` if `v` is on any route.
    pub fn is_placed(&self, v: usize) -> bool {
        slot_of(&self.next, v) != NOT_SET
    }

    /// Read-only view of a route, or `None` for a foreign handle.
    pub fn get(&self, id: RouteId) -> Option<TourRef<'_>> {
        let anchor = self.anchors.get(id.0)?;
        Some(TourView {
            next: self.next.as_slice(),
            anchor,
        })
    }

    /// Mutable view of a route, or `None` for a foreign handle.
    pub fn get_mut(&mut self, id: RouteId) -> Option<TourMut<'_>> {
        let anchor = self.anchors.get_mut(id.0)?;
        Some(TourView {
            next: &mut self.next,
            anchor,
        })
    }

    /// Read-only view of a route.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this multi-tour.
    pub fn tour(&self, id: RouteId) -> TourRef<'_> {
        TourView {
            next: self.next.as_slice(),
            anchor: &self.anchors[id.0],
        }
    }

    /// Mutable view of a route.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this multi-tour.
    pub fn tour_mut(&mut self, id: RouteId) -> TourMut<'_> {
        TourView {
            next: &mut self.next,
            anchor: &mut self.anchors[id.0],
        }
    }

    /// Checks that `id` belongs to this multi-tour.
    pub fn check(&self, id: RouteId) -> Result<(), TourError> {
        if id.0 < self.anchors.len() {
            Ok(())
        } else {
            Err(TourError::UnknownRoute(id.0))
        }
    }

    /// All routes with their handles.
    pub fn tours(&self) -> impl Iterator<Item = (RouteId, TourRef<'_>)> + '_ {
        self.route_ids().map(move |id| (id, self.tour(id)))
    }

    /// Route holding `v`. O(total visits).
    pub fn route_of(&self, v: usize) -> Option<RouteId> {
        if !self.is_placed(v) {
            return None;
        }
        self.tours().find(|(_, t)| t.contains(v)).map(|(id, _)| id)
    }

    /// Total number of visits over all routes.
    pub fn num_visits(&self) -> usize {
        self.tours().map(|(_, t)| t.len()).sum()
    }

    /// Marks `v` unused. The caller has already routed around it.
    pub(crate) fn release(&mut self, v: usize) {
        if let Some(slot) = self.next.get_mut(v) {
            *slot = NOT_SET;
        }
    }

    /// Swaps `v1` (after `p1` on `r1`) with `v2` (after `p2` on `r2`).
    ///
    /// Neither visit may be its route's first. Terminal markers stay with
    /// their slot position, so a visit taking over a terminal becomes the
    /// new terminal of its new route.
    pub fn exchange(
        &mut self,
        r1: RouteId,
        [p1, v1]: [usize; 2],
        r2: RouteId,
        [p2, v2]: [usize; 2],
    ) -> Result<(), TourError> {
        self.check(r1)?;
        self.check(r2)?;
        for (id, v) in [(r1, v1), (r2, v2)] {
            let anchor = self.anchors[id.0];
            if v == anchor.first {
                return Err(TourError::RemoveFirst(v));
            }
            if anchor.is_fixed_last(v) {
                return Err(TourError::RemoveFixedLast(v));
            }
        }
        let s1 = slot_of(&self.next, v1);
        let s2 = slot_of(&self.next, v2);
        if s1 == NOT_SET {
            return Err(TourError::NotPresent(v1));
        }
        if s2 == NOT_SET {
            return Err(TourError::NotPresent(v2));
        }
        self.tour_mut(r1).replace_edge_from(p1, v2)?;
        self.tour_mut(r2).replace_edge_from(p2, v1)?;
        self.next[v1] = s2;
        self.next[v2] = s1;
        Ok(())
    }

    /// Moves the run `run` out of route `from` and inserts it after `at` on
    /// route `to`.
    ///
    /// The run must not hold `from`'s first visit; rotate a closed route
    /// first if it does.
    pub fn move_run(&mut self, from: RouteId, run: RunEnds, to: RouteId, at: usize) -> Result<(), TourError> {
        self.check(from)?;
        self.check(to)?;
        if run.first == self.anchors[from.0].first {
            return Err(TourError::RemoveFirst(run.first));
        }
        if !self.tour(to).contains(at) {
            return Err(TourError::NotPresent(at));
        }
        let tail = self.tour(to).next_of(at);
        self.tour_mut(from).replace_edge_from(run.before, run.after)?;
        self.tour_mut(to).insert_run(at, run.first, run.last, tail)
    }

    /// Exchanges run `a` of route `r1` with run `b` of route `r2`.
    ///
    /// Neither run may hold its route's first visit.
    pub fn exchange_runs(&mut self, r1: RouteId, a: RunEnds, r2: RouteId, b: RunEnds) -> Result<(), TourError> {
        self.check(r1)?;
        self.check(r2)?;
        if a.first == self.anchors[r1.0].first {
            return Err(TourError::RemoveFirst(a.first));
        }
        if b.first == self.anchors[r2.0].first {
            return Err(TourError::RemoveFirst(b.first));
        }
        if !self.tour(r1).contains(a.before) {
            return Err(TourError::NotPresent(a.before));
        }
        if !self.tour(r2).contains(b.before) {
            return Err(TourError::NotPresent(b.before));
        }
        self.tour_mut(r1).insert_run(a.before, b.first, b.last, Some(a.after))?;
        self.tour_mut(r2).insert_run(b.before, a.first, a.last, Some(b.after))
    }
}

impl<'a> TourView<&'a mut Vec<usize>, &'a mut Anchor> {
    /// Links the already-chained run `first..=last` between `at` and `tail`.
    pub(crate) fn insert_run(
        &mut self,
        at: usize,
        first: usize,
        last: usize,
        tail: Option<usize>,
    ) -> Result<(), TourError> {
        if !self.view().contains(at) {
            return Err(TourError::NotPresent(at));
        }
        if self.anchor.is_fixed_last(at) {
            return Err(TourError::InsertAfterFixedLast(at));
        }
        self.next[last] = match tail {
            Some(t) => self.anchor.encode(t),
            None => super::END,
        };
        self.next[at] = first;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_routes() -> (MultiTour, RouteId, RouteId) {
        let mut tours = MultiTour::new();
        let a = tours.add_visits(&[0, 1, 2, 3], Some(0)).expect("valid");
        let b = tours.add_visits(&[4, 5, 6], Some(4)).expect("valid");
        (tours, a, b)
    }

    #[test]
    fn test_add_rejects_overlap() {
        let (mut tours, _, _) = two_routes();
        assert_eq!(tours.add_visits(&[7, 2], None), Err(TourError::AlreadyPresent(2)));
        assert_eq!(tours.len(), 2);
    }

    #[test]
    fn test_add_fixed_pair() {
        let mut tours = MultiTour::new();
        let id = tours.add(3, Some(8)).expect("valid");
        assert_eq!(tours.tour(id).to_vec(), vec![3, 8]);
        assert_eq!(tours.tour(id).last(), 8);
    }

    #[test]
    fn test_views_do_not_cross_write() {
        let (mut tours, a, b) = two_routes();
        tours.tour_mut(a).insert_after(3, 9).expect("insert");
        tours.tour_mut(b).remove(5).expect("remove");
        assert_eq!(tours.tour(a).to_vec(), vec![0, 1, 2, 3, 9]);
        assert_eq!(tours.tour(b).to_vec(), vec![4, 6]);
        assert!(tours.tour(a).contains_edge(9, 0));
        assert!(tours.tour(b).contains_edge(6, 4));
    }

    #[test]
    fn test_views_reject_foreign_visits() {
        let (mut tours, a, b) = two_routes();
        let before = tours.clone();
        assert_eq!(tours.tour_mut(a).insert_after(5, 9), Err(TourError::NotPresent(5)));
        assert_eq!(tours.tour_mut(a).replace_edge_from(6, 0), Err(TourError::NotPresent(6)));
        assert_eq!(tours.tour_mut(b).shift_after(5, 2), Err(TourError::NotPresent(2)));
        assert_eq!(tours.tour_mut(b).remove(1), Err(TourError::NotPresent(1)));
        assert_eq!(tours, before);
        assert_eq!(tours.tour(a).to_vec(), vec![0, 1, 2, 3]);
        assert_eq!(tours.tour(b).to_vec(), vec![4, 5, 6]);
    }

    #[test]
    fn test_move_run_rejects_foreign_target() {
        let (mut tours, a, b) = two_routes();
        let run = RunEnds {
            before: 0,
            first: 1,
            last: 2,
            after: 3,
        };
        let before = tours.clone();
        assert_eq!(tours.move_run(a, run, b, 3), Err(TourError::NotPresent(3)));
        assert_eq!(tours, before);
    }

    #[test]
    fn test_exchange_terminals() {
        let (mut tours, a, b) = two_routes();
        tours.exchange(a, [2, 3], b, [5, 6]).expect("swap");
        assert_eq!(tours.tour(a).to_vec(), vec![0, 1, 2, 6]);
        assert_eq!(tours.tour(b).to_vec(), vec![4, 5, 3]);
        assert!(tours.tour(a).contains_edge(6, 0));
        assert!(tours.tour(b).contains_edge(3, 4));
    }

    #[test]
    fn test_exchange_rejects_first() {
        let (mut tours, a, b) = two_routes();
        let before = tours.clone();
        assert_eq!(tours.exchange(a, [3, 0], b, [4, 5]), Err(TourError::RemoveFirst(0)));
        assert_eq!(tours, before);
    }

    #[test]
    fn test_move_run() {
        let (mut tours, a, b) = two_routes();
        let run = RunEnds {
            before: 0,
            first: 1,
            last: 2,
            after: 3,
        };
        tours.move_run(a, run, b, 6).expect("move");
        assert_eq!(tours.tour(a).to_vec(), vec![0, 3]);
        assert_eq!(tours.tour(b).to_vec(), vec![4, 5, 6, 1, 2]);
        assert!(tours.tour(b).contains_edge(2, 4));
    }

    #[test]
    fn test_exchange_runs() {
        let (mut tours, a, b) = two_routes();
        let ra = RunEnds {
            before: 1,
            first: 2,
            last: 3,
            after: 0,
        };
        let rb = RunEnds {
            before: 4,
            first: 5,
            last: 5,
            after: 6,
        };
        tours.exchange_runs(a, ra, b, rb).expect("swap");
        assert_eq!(tours.tour(a).to_vec(), vec![0, 1, 5]);
        assert_eq!(tours.tour(b).to_vec(), vec![4, 2, 3, 6]);
        assert_eq!(tours.num_visits(), 7);
    }

    #[test]
    fn test_structural_equality() {
        let (tours, _, _) = two_routes();
        let copy = tours.clone();
        assert_eq!(copy, tours);
        let (mut other, a, _) = two_routes();
        other.tour_mut(a).shift_after(1, 2).expect("shift");
        assert_ne!(other, tours);
    }

    #[test]
    fn test_unknown_route() {
        let (tours, _, _) = two_routes();
        let foreign = RouteId(7);
        assert!(tours.get(foreign).is_none());
        assert_eq!(tours.check(foreign), Err(TourError::UnknownRoute(7)));
    }
}
