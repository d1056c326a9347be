//! Aggregates - Cluster of domain objects treated as a single unit

mod conduct;
mod membership;
mod queries;
pub mod universe;

pub use universe::Universe;
