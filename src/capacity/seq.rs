//! Contiguous runs of visits.

use crate::tour::RunEnds;

/// A contiguous run of visits cut out of a tour.
///
/// Carries the visits directly around it and its aggregate cost: the true
/// travel cost of its internal edges plus the fixed costs of its visits.
/// Moving the run between tours keeps that aggregate intact, so a move only
/// has to price the boundary edges.
///
/// Runs are produced by
/// [`Objective::seq_and_smaller`](crate::objective::Objective::seq_and_smaller),
/// which prices them on the route they come from.
///
/// # Examples
///
/// ```
/// use u_cvrp::capacity::Capacity;
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::objective::Objective;
/// use u_cvrp::solution::Solution;
/// use u_cvrp::tour::Tour;
///
/// let mut dm = DistanceMatrix::new(8);
/// for a in 0..8 {
///     for b in 0..8 {
///         dm.set(a, b, (a as f64 - b as f64).abs());
///     }
/// }
/// let objective = Objective::new(dm, Capacity::new(100.0));
/// let mut solution = Solution::new();
/// let id = solution
///     .add_tour(&Tour::open(&[3, 4, 5, 6, 7]).unwrap(), objective.capacity().empty_content())
///     .unwrap();
/// objective.refresh(&mut solution).unwrap();
///
/// let runs = objective.seq_and_smaller(&solution, id, 3, 3, false).unwrap();
/// let seq = &runs[0];
/// assert_eq!(seq.visits(), &[4, 5, 6]);
/// assert_eq!((seq.before(), seq.after()), (3, 7));
/// assert!((seq.cost() - 2.0).abs() < 1e-10);
/// ```
///
/// A run cannot be built by hand with an arbitrary cost:
///
/// ```compile_fail
/// use u_cvrp::capacity::Seq;
///
/// let _ = Seq::new(vec![4, 5], 3, 6, 99.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Seq {
    visits: Vec<usize>,
    before: usize,
    after: usize,
    cost: f64,
}

impl Seq {
    /// Creates a run. Returns `None` if `visits` is empty.
    ///
    /// `cost` must be the run's true aggregate on the matrix it will be
    /// priced against; moves write it into route contents unchecked.
    pub(crate) fn new(visits: Vec<usize>, before: usize, after: usize, cost: f64) -> Option<Self> {
        if visits.is_empty() {
            return None;
        }
        Some(Self {
            visits,
            before,
            after,
            cost,
        })
    }

    /// Visits of the run in tour order.
    pub fn visits(&self) -> &[usize] {
        &self.visits
    }

    /// First visit of the run.
    pub fn first(&self) -> usize {
        self.visits[0]
    }

    /// Last visit of the run.
    pub fn last(&self) -> usize {
        self.visits[self.visits.len() - 1]
    }

    /// Visit directly before the run.
    pub fn before(&self) -> usize {
        self.before
    }

    /// Visit directly after the run.
    pub fn after(&self) -> usize {
        self.after
    }

    /// Aggregate cost of the run.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of visits.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Always `false`: empty runs cannot be built.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if `v` is in the run.
    pub fn contains(&self, v: usize) -> bool {
        self.visits.contains(&v)
    }

    /// Boundary of the run, as the multi-tour edits expect it.
    pub fn ends(&self) -> RunEnds {
        RunEnds {
            before: self.before,
            first: self.first(),
            last: self.last(),
            after: self.after,
        }
    }
}
