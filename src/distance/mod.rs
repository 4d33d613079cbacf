//! Travel-cost matrices.
//!
//! Provides the dense, possibly asymmetric cost matrix that tours are
//! priced against.

mod matrix;

pub use matrix::DistanceMatrix;
