//! Zoom policy and scoring passes.

pub mod zoom;
pub mod interest;

pub use zoom::{PolicyError, ZoomPolicy};
pub use interest::GroupInterest;
