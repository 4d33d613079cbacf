//! A single route that owns its successor array.

use super::iter::{Between, Visits, Windows};
use super::{link, validate, Anchor, TourKind, TourMut, TourRef, TourView};
use crate::error::TourError;

/// One vehicle's route.
///
/// Built once from an initial sequence and then edited in place. `Clone`
/// deep-copies the successor array; `PartialEq` compares the anchor and the
/// whole array.
///
/// # Examples
///
/// ```
/// use u_cvrp::tour::Tour;
///
/// let mut tour = Tour::closed(&[0, 1, 2, 3]).unwrap();
/// tour.insert_after(1, 9).unwrap();
/// assert_eq!(tour.to_vec(), vec![0, 1, 9, 2, 3]);
/// assert_eq!(tour.len(), 5);
/// assert!(tour.contains_edge(1, 9));
/// assert!(!tour.contains_edge(1, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    next: Vec<usize>,
    anchor: Anchor,
}

impl Tour {
    /// Builds a tour from `visits`.
    ///
    /// `last = None` makes an open tour, `Some(visits[0])` a closed one, and
    /// any other `Some(l)` pins `l`, which must be the final visit.
    pub fn new(visits: &[usize], last: Option<usize>) -> Result<Self, TourError> {
        let anchor = validate(visits, last)?;
        let mut next = Vec::new();
        link(&mut next, visits);
        Ok(Self { next, anchor })
    }

    /// Open tour over `visits`.
    pub fn open(visits: &[usize]) -> Result<Self, TourError> {
        Self::new(visits, None)
    }

    /// Closed tour over `visits`.
    pub fn closed(visits: &[usize]) -> Result<Self, TourError> {
        Self::new(visits, visits.first().copied())
    }

    /// Tour whose final visit is pinned.
    pub fn fixed(visits: &[usize]) -> Result<Self, TourError> {
        Self::new(visits, visits.last().copied())
    }

    pub(crate) fn from_parts(next: Vec<usize>, anchor: Anchor) -> Self {
        Self { next, anchor }
    }

    /// Read-only view.
    pub fn view(&self) -> TourRef<'_> {
        TourView {
            next: &self.next,
            anchor: &self.anchor,
        }
    }

    /// Mutable view.
    pub fn view_mut(&mut self) -> TourMut<'_> {
        TourView {
            next: &mut self.next,
            anchor: &mut self.anchor,
        }
    }

    /// The raw successor array.
    pub fn slots(&self) -> &[usize] {
        &self.next
    }

    /// Anchor (first visit and shape).
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// First visit.
    pub fn first(&self) -> usize {
        self.anchor.first
    }

    /// Tour shape.
    pub fn kind(&self) -> TourKind {
        self.anchor.kind
    }

    /// Last visit.
    pub fn last(&self) -> usize {
        self.view().last()
    }

    /// Number of visits.
    pub fn len(&self) -> usize {
        self.view().len()
    }

    /// Always `false`: a tour keeps at least its first visit.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Visits in order.
    pub fn visits(&self) -> Visits<'_> {
        Visits::new(&self.next, self.anchor)
    }

    /// Visits collected into a vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.view().to_vec()
    }

    /// Successor of `v`.
    pub fn next_of(&self, v: usize) -> Option<usize> {
        self.view().next_of(v)
    }

    /// Returns `true` if `v` is on the tour.
    pub fn contains(&self, v: usize) -> bool {
        self.view().contains(v)
    }

    /// Returns `true` if `to` directly follows `from`.
    pub fn contains_edge(&self, from: usize, to: usize) -> bool {
        self.view().contains_edge(from, to)
    }

    /// Visits from `from` up to and including `to`.
    pub fn between(&self, from: usize, to: usize) -> Between<'_> {
        Between::new(&self.next, self.anchor, from, to)
    }

    /// Consecutive pairs.
    pub fn pairs(&self) -> Windows<'_, 2> {
        Windows::new(&self.next, self.anchor)
    }

    /// Consecutive triples.
    pub fn triples(&self) -> Windows<'_, 3> {
        Windows::new(&self.next, self.anchor)
    }

    /// Consecutive quadruplets.
    pub fn quadruplets(&self) -> Windows<'_, 4> {
        Windows::new(&self.next, self.anchor)
    }

    /// See [`TourMut::insert_after`].
    pub fn insert_after(&mut self, from: usize, v: usize) -> Result<(), TourError> {
        self.view_mut().insert_after(from, v)
    }

    /// See [`TourMut::remove`].
    pub fn remove(&mut self, v: usize) -> Result<(), TourError> {
        self.view_mut().remove(v)
    }

    /// See [`TourMut::remove_between`].
    pub fn remove_between(&mut self, v: usize) -> Result<(usize, Option<usize>), TourError> {
        self.view_mut().remove_between(v)
    }

    /// See [`TourMut::replace_edge_from`].
    pub fn replace_edge_from(&mut self, from: usize, to: usize) -> Result<(), TourError> {
        self.view_mut().replace_edge_from(from, to)
    }

    /// See [`TourMut::shift_after`].
    pub fn shift_after(&mut self, v: usize, before: usize) -> Result<(), TourError> {
        self.view_mut().shift_after(v, before)
    }

    /// See [`TourMut::rotate_to`].
    pub fn rotate_to(&mut self, new_first: usize) -> Result<(), TourError> {
        self.view_mut().rotate_to(new_first)
    }
}
