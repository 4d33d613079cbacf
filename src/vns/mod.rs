//! Guided Variable Neighborhood Search.
//!
//! Alternates a full [`local_search`](crate::objective::Objective::local_search)
//! descent with edge penalties: each round penalizes the costliest
//! unpenalized edge of a random route pair on the working matrix, which
//! pushes the next descent out of the current local optimum. True costs
//! decide which solution is kept. Once the cumulative penalty reaches its
//! limit the penalties are lifted and the cycle starts over.
//!
//! # References
//!
//! - Voudouris, C. & Tsang, E. (1999). "Guided local search and its
//!   application to the traveling salesman problem", *European Journal of
//!   Operational Research* 113(2), 469-499.
//! - Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//!   *Computers & Operations Research* 24(11), 1097-1100.

mod config;
mod runner;

pub use config::VnsConfig;
pub use runner::{GuidedVns, VnsResult};
