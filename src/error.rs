//! Error types.
//!
//! Contract violations surface as these errors. Search exhaustion
//! (no improving move, infeasible candidate) is never an error: the
//! objective reports it as `Ok(false)`.

use thiserror::Error;

/// Structural contract violations on a tour or multi-tour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// A tour must be built from at least one visit.
    #[error("a tour needs at least one visit")]
    Empty,
    /// The id collides with one of the successor-array sentinels.
    #[error("visit id {0} is reserved as a sentinel")]
    Reserved(usize),
    /// The referenced visit is not part of the tour.
    #[error("visit {0} is not in the tour")]
    NotPresent(usize),
    /// The visit is already placed in the successor array.
    #[error("visit {0} is already in a tour")]
    AlreadyPresent(usize),
    /// A visit cannot be inserted after itself.
    #[error("cannot insert visit {0} after itself")]
    SelfInsertion(usize),
    /// The first visit anchors the tour and cannot be removed.
    #[error("visit {0} is the first visit of its tour")]
    RemoveFirst(usize),
    /// A pinned last visit cannot be removed.
    #[error("visit {0} is the fixed last visit of its tour")]
    RemoveFixedLast(usize),
    /// Nothing may follow a pinned last visit.
    #[error("cannot insert after the fixed last visit {0}")]
    InsertAfterFixedLast(usize),
    /// `shift_after(v, v)` has no meaning.
    #[error("cannot shift visit {0} after itself")]
    ShiftOntoSelf(usize),
    /// The pinned last visit given at construction does not end the sequence.
    #[error("fixed last {expected} does not end the sequence (found {found})")]
    FixedLastMismatch {
        /// Requested last visit.
        expected: usize,
        /// Actual final element of the sequence.
        found: usize,
    },
    /// Only closed tours can be re-anchored.
    #[error("only closed tours can be rotated")]
    NotClosed,
    /// Route handle does not belong to this multi-tour.
    #[error("route {0} does not exist")]
    UnknownRoute(usize),
}

/// Resource accounting violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapacityError {
    /// A recompute found a constraint already exceeded.
    #[error("constraint `{name}` exceeded: {quantity} > {max}")]
    ConstraintViolated {
        /// Constraint name.
        name: String,
        /// Recomputed quantity.
        quantity: f64,
        /// Constraint maximum.
        max: f64,
    },
    /// An incremental update was asked to commit an infeasible change.
    #[error("committing an infeasible change to tour content")]
    Infeasible,
    /// Content and capacity disagree on the number of constraints.
    #[error("content tracks {content} quantities but capacity has {capacity} constraints")]
    DimensionMismatch {
        /// Quantities held by the content.
        content: usize,
        /// Constraints defined by the capacity.
        capacity: usize,
    },
}

/// Errors raised by the local-search objective.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectiveError {
    /// Structural contract violation.
    #[error(transparent)]
    Tour(#[from] TourError),
    /// Resource accounting violation.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    /// Contents and tours are no longer index-aligned.
    #[error("{contents} contents for {tours} tours")]
    CountMismatch {
        /// Number of contents.
        contents: usize,
        /// Number of tours.
        tours: usize,
    },
    /// The given window is not consecutive in its tour.
    #[error("window {0:?} is not consecutive in route {1}")]
    StaleWindow(Vec<usize>, usize),
    /// The seed selector returned a visit that was not offered.
    #[error("seed selector picked visit {0}, which is not remaining")]
    UnknownSeed(usize),
}
