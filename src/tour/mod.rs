//! Successor-array tours.
//!
//! A tour is a walk over visit ids stored as a flat successor array:
//! `next[v]` is the visit after `v`. Two sentinels mark the special slots:
//! [`NOT_SET`] for ids that are not in any tour and [`END`] for the terminal
//! visit. A closed tour keeps [`END`] in its terminal slot too; every read
//! through a view reinterprets it as the tour's first visit.
//!
//! - [`Tour`]: one route owning its array
//! - [`MultiTour`]: many routes sharing one array, addressed by [`RouteId`]
//! - [`TourView`]: the per-route view both hand out ([`TourRef`], [`TourMut`])
//! - [`Windows`], [`Visits`], [`Between`]: lazy, restartable walks

mod iter;
mod multi;
mod single;
mod view;

use serde::{Deserialize, Serialize};

pub use iter::{Between, Visits, Windows};
pub use multi::{MultiTour, RouteId, RunEnds};
pub use single::Tour;
pub use view::{TourMut, TourRef, TourView};

/// Slot value of a visit that belongs to no tour.
pub const NOT_SET: usize = usize::MAX;

/// Slot value of a tour's terminal visit.
pub const END: usize = usize::MAX - 1;

/// Shape of a tour, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TourKind {
    /// A path that stops at its terminal visit.
    Open,
    /// A cycle: the terminal visit is followed by the first.
    Closed,
    /// A path whose last visit is pinned and can neither be removed nor
    /// followed by an insertion.
    Fixed(usize),
}

/// The per-route anchor: first visit plus shape.
///
/// # Examples
///
/// ```
/// use u_cvrp::tour::{Anchor, TourKind};
///
/// assert_eq!(Anchor::new(3, None).kind(), TourKind::Open);
/// assert_eq!(Anchor::new(3, Some(3)).kind(), TourKind::Closed);
/// assert_eq!(Anchor::new(3, Some(7)).kind(), TourKind::Fixed(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub(crate) first: usize,
    pub(crate) kind: TourKind,
}

impl Anchor {
    /// Builds an anchor: no `last` is open, `last == first` is closed,
    /// anything else pins `last`.
    pub fn new(first: usize, last: Option<usize>) -> Self {
        let kind = match last {
            None => TourKind::Open,
            Some(l) if l == first => TourKind::Closed,
            Some(l) => TourKind::Fixed(l),
        };
        Self { first, kind }
    }

    /// First visit.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Tour shape.
    pub fn kind(&self) -> TourKind {
        self.kind
    }

    /// Returns `true` for a cyclic tour.
    pub fn is_closed(&self) -> bool {
        self.kind == TourKind::Closed
    }

    /// Returns `true` if `v` is the pinned last visit.
    pub fn is_fixed_last(&self, v: usize) -> bool {
        self.kind == TourKind::Fixed(v)
    }

    /// Encodes `to` for storage in a slot of this tour.
    pub(crate) fn encode(&self, to: usize) -> usize {
        if to == self.first {
            END
        } else {
            to
        }
    }

    /// Decodes a raw slot value into the successor it denotes.
    pub(crate) fn decode(&self, slot: usize) -> Option<usize> {
        match slot {
            NOT_SET => None,
            END if self.is_closed() => Some(self.first),
            END => None,
            v => Some(v),
        }
    }
}

/// Reads a slot, treating ids past the end of the array as unused.
pub(crate) fn slot_of(next: &[usize], v: usize) -> usize {
    next.get(v).copied().unwrap_or(NOT_SET)
}

/// Links `visits` in order into `next`, growing it as needed. The final
/// visit receives [`END`].
pub(crate) fn link(next: &mut Vec<usize>, visits: &[usize]) {
    if let Some(&max) = visits.iter().max() {
        if max >= next.len() {
            next.resize(max + 1, NOT_SET);
        }
    }
    for pair in visits.windows(2) {
        next[pair[0]] = pair[1];
    }
    if let Some(&last) = visits.last() {
        next[last] = END;
    }
}

/// Checks a visit sequence before it is linked: non-empty, no sentinel ids,
/// no duplicates, and a pinned last that really ends the sequence.
pub(crate) fn validate(
    visits: &[usize],
    last: Option<usize>,
) -> Result<Anchor, crate::error::TourError> {
    use crate::error::TourError;
    use std::collections::HashSet;

    let (&first, &tail) = match (visits.first(), visits.last()) {
        (Some(f), Some(t)) => (f, t),
        _ => return Err(TourError::Empty),
    };
    let mut seen = HashSet::with_capacity(visits.len());
    for &v in visits {
        if v >= END {
            return Err(TourError::Reserved(v));
        }
        if !seen.insert(v) {
            return Err(TourError::AlreadyPresent(v));
        }
    }
    let anchor = Anchor::new(first, last);
    if let TourKind::Fixed(l) = anchor.kind {
        if l != tail {
            return Err(TourError::FixedLastMismatch {
                expected: l,
                found: tail,
            });
        }
    }
    Ok(anchor)
}
