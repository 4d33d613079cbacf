//! Resource accounting for tours.
//!
//! - [`Capacity`]: the per-vehicle budget: a primary limit plus named
//!   [`Constraint`]s with a per-visit value each
//! - [`Content`]: what one tour currently consumes, kept in step with the
//!   tour by incremental updates
//! - [`Seq`]: a contiguous run of visits with its cached aggregate cost,
//!   so run moves price the whole window at once

mod content;
mod limits;
mod seq;

pub use content::Content;
pub use limits::{Capacity, Constraint};
pub use seq::Seq;
