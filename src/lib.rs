//! # u-cvrp
//!
//! Depot-free capacitated vehicle routing: tours stored as successor
//! arrays, incremental capacity bookkeeping, and a relocate/exchange local
//! search guided by edge penalties.
//!
//! ## Modules
//!
//! - [`tour`]: single routes and several routes sharing one successor array
//! - [`capacity`]: resource limits, per-route [`Content`](capacity::Content) and [`Seq`](capacity::Seq) runs
//! - [`distance`]: dense travel-cost matrix
//! - [`solution`]: routes plus aligned contents and cached depot placements
//! - [`objective`]: moves, window enumeration, penalties and greedy construction
//! - [`vns`]: Guided Variable Neighborhood Search runner
//! - [`tolerance`]: named epsilons
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```
//! use u_cvrp::capacity::{Capacity, Constraint};
//! use u_cvrp::distance::DistanceMatrix;
//! use u_cvrp::objective::{seed, Objective};
//! use u_cvrp::solution::Solution;
//!
//! let points: [f64; 6] = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
//! let mut dm = DistanceMatrix::new(points.len());
//! for (a, pa) in points.iter().enumerate() {
//!     for (b, pb) in points.iter().enumerate() {
//!         dm.set(a, b, (pa - pb).abs());
//!     }
//! }
//! let capacity = Capacity::new(f64::INFINITY)
//!     .with_constraint(Constraint::new("load", 3.0, vec![1.0; 6]));
//! let objective = Objective::new(dm, capacity);
//!
//! let mut solution = Solution::new();
//! objective
//!     .construct(&mut solution, &[0, 1, 2, 3, 4, 5], seed::first_remaining)
//!     .unwrap();
//! objective.local_search(&mut solution).unwrap();
//! assert_eq!(solution.len(), 2);
//! assert!((objective.total_cost(&solution) - 8.0).abs() < 1e-10);
//! ```

pub mod capacity;
pub mod distance;
pub mod error;
pub mod objective;
pub mod solution;
pub mod tolerance;
pub mod tour;
pub mod vns;
