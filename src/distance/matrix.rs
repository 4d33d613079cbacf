//! Dense travel-cost matrix.

use serde::{Deserialize, Serialize};

/// A dense n×n travel-cost matrix stored in row-major order.
///
/// Costs may be asymmetric. Row and column `i` belong to visit `i`.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 5.0, 8.0],
///     vec![5.0, 0.0, 4.0],
///     vec![9.0, 4.0, 0.0],
/// ])
/// .unwrap();
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// assert!((dm.get(2, 0) - 9.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from nested rows.
    ///
    /// Returns `None` unless every row is as long as the number of rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.concat(),
            size,
        })
    }

    /// Returns the cost of travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost of travelling from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, cost: f64) {
        self.data[from * self.size + to] = cost;
    }

    /// Number of visits covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the candidate closest to `from`.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }

    /// Returns the candidate farthest from `from`.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn farthest(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .max_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 5.0, 8.0],
            vec![5.0, 0.0, 4.0],
            vec![8.0, 4.0, 0.0],
        ])
        .expect("square")
    }

    #[test]
    fn test_from_rows() {
        let dm = sample();
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!(dm.get(1, 1).abs() < 1e-10);
    }

    #[test]
    fn test_from_rows_ragged() {
        assert!(DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]).is_none());
    }

    #[test]
    fn test_set_get() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 42.0);
        assert_eq!(dm.get(0, 1), 42.0);
        assert_eq!(dm.get(1, 0), 0.0);
    }

    #[test]
    fn test_nearest_and_farthest() {
        let dm = sample();
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(dm.farthest(0, &[1, 2]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, &[]), None);
        assert_eq!(dm.farthest(0, &[]), None);
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert_eq!(dm.get(0, 1), 10.0);
        assert_eq!(dm.get(1, 0), 15.0);
    }
}
