//! Stock seed selectors for construction.
//!
//! A selector receives the visits that are still unrouted (never empty)
//! and returns the one that starts the next route.

use rand::Rng;

use crate::distance::DistanceMatrix;

/// Picks the first remaining visit.
///
/// # Panics
///
/// Panics if `remaining` is empty.
pub fn first_remaining(remaining: &[usize]) -> usize {
    remaining[0]
}

/// Picks the remaining visit farthest from `origin`.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::objective::seed;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 2.0, 7.0],
///     vec![2.0, 0.0, 5.0],
///     vec![7.0, 5.0, 0.0],
/// ])
/// .unwrap();
/// let mut select = seed::farthest_from(&dm, 0);
/// assert_eq!(select(&[1, 2]), 2);
/// ```
pub fn farthest_from(matrix: &DistanceMatrix, origin: usize) -> impl FnMut(&[usize]) -> usize + '_ {
    move |remaining| matrix.farthest(origin, remaining).unwrap_or(origin)
}

/// Picks the remaining visit nearest to `origin`, e.g. to grow routes
/// outward from a depot.
pub fn nearest_to(matrix: &DistanceMatrix, origin: usize) -> impl FnMut(&[usize]) -> usize + '_ {
    move |remaining| matrix.nearest_neighbor(origin, remaining).unwrap_or(remaining[0])
}

/// Picks a remaining visit uniformly at random.
pub fn random<R: Rng>(rng: &mut R) -> impl FnMut(&[usize]) -> usize + '_ {
    move |remaining| remaining[rng.random_range(0..remaining.len())]
}
