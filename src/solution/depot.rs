//! Depot detour placement.
//!
//! Routes in this crate do not start at a depot. When a depot exists, each
//! route pays for one detour through it, inserted after the visit where it
//! is cheapest. The search for that visit is pluggable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::tour::TourRef;

/// Where a route detours through the depot and what the detour costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepotSlot {
    /// Visit after which the detour is taken.
    pub point: usize,
    /// Extra cost of the detour over the direct edge.
    pub cost: f64,
}

/// Chooses the depot detour of a route.
///
/// Implementations must keep `place` consistent with `detour`: the returned
/// slot costs exactly `detour(point, successor)` on the given tour and no
/// more than `detour` on any other edge of that tour. The objective relies
/// on this to price a move by the cached slot or a newly created edge
/// before it falls back to an exact `place` on the edited route.
pub trait DepotPlacement: fmt::Debug + Send + Sync {
    /// Cheapest detour on `tour`.
    fn place(&self, tour: TourRef<'_>, matrix: &DistanceMatrix) -> DepotSlot;

    /// Cost of leaving edge `(a, b)` for the depot and coming back.
    fn detour(&self, a: usize, b: usize, matrix: &DistanceMatrix) -> f64;
}

/// Cheapest-insertion placement of a depot that is itself a matrix row.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::solution::{CheapestDetour, DepotPlacement};
/// use u_cvrp::tour::Tour;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 5.0, 2.0],
///     vec![1.0, 0.0, 4.0, 2.0],
///     vec![5.0, 4.0, 0.0, 6.0],
///     vec![2.0, 2.0, 6.0, 0.0],
/// ])
/// .unwrap();
/// let depot = CheapestDetour::new(3);
/// let tour = Tour::closed(&[0, 1, 2]).unwrap();
/// let slot = depot.place(tour.view(), &dm);
/// assert_eq!(slot.point, 0);
/// assert!((slot.cost - 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheapestDetour {
    depot: usize,
}

impl CheapestDetour {
    /// Places detours through matrix row `depot`.
    pub fn new(depot: usize) -> Self {
        Self { depot }
    }

    /// The depot's matrix index.
    pub fn depot(&self) -> usize {
        self.depot
    }
}

impl DepotPlacement for CheapestDetour {
    fn place(&self, tour: TourRef<'_>, matrix: &DistanceMatrix) -> DepotSlot {
        let best = tour
            .pairs()
            .map(|[a, b]| DepotSlot {
                point: a,
                cost: self.detour(a, b, matrix),
            })
            .min_by(|x, y| x.cost.total_cmp(&y.cost));
        // An open route of one visit has no edge: go there and back.
        best.unwrap_or_else(|| {
            let v = tour.first();
            DepotSlot {
                point: v,
                cost: self.detour(v, v, matrix),
            }
        })
    }

    fn detour(&self, a: usize, b: usize, matrix: &DistanceMatrix) -> f64 {
        matrix.get(a, self.depot) + matrix.get(self.depot, b) - matrix.get(a, b)
    }
}
