//! Per-tour resource usage.

use serde::{Deserialize, Serialize};

/// Resources consumed by one tour.
///
/// `weight` is the tour's primary cost (travel, fixed visit costs and any
/// depot detour); `quantities[i]` is the sum of constraint `i`'s values over
/// the tour's visits. Only [`Capacity`](super::Capacity) mutates it.
///
/// # Examples
///
/// ```
/// use u_cvrp::capacity::Content;
///
/// let content = Content::new(12.5, vec![3.0]);
/// assert_eq!(content.weight(), 12.5);
/// assert_eq!(content.quantities(), &[3.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub(crate) weight: f64,
    pub(crate) quantities: Vec<f64>,
}

impl Content {
    /// Creates a content record.
    pub fn new(weight: f64, quantities: Vec<f64>) -> Self {
        Self { weight, quantities }
    }

    /// Primary resource consumed.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Quantities per constraint.
    pub fn quantities(&self) -> &[f64] {
        &self.quantities
    }

    /// Returns `true` if both records agree within `tol` on every figure.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        (self.weight - other.weight).abs() <= tol
            && self.quantities.len() == other.quantities.len()
            && self
                .quantities
                .iter()
                .zip(&other.quantities)
                .all(|(a, b)| (a - b).abs() <= tol)
    }
}
