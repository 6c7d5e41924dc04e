//! Model interpretability
//!
//! Information-gain feature ranking for presentation.

mod importance;

pub use importance::{GainOrder, GainReport};
