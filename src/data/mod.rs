//! Tabular categorical data
//!
//! - [`Dataset`] - immutable table views with filtering and partitioning
//! - [`synthetic`] - the built-in weather demo table

mod dataset;
pub mod synthetic;

pub use dataset::{Dataset, Row};
pub use synthetic::{tennis, TENNIS_FEATURES, TENNIS_TARGET};
