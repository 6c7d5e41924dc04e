//! ID3 Tree - decision tree induction over categorical tables
//!
//! Builds a decision tree with the ID3 algorithm (greedy, entropy-based
//! attribute selection) and reports the information gain of every feature.
//!
//! # Modules
//!
//! - [`data`] - Immutable categorical datasets and the built-in demo table
//! - [`training`] - Entropy, information gain and the tree builder
//! - [`explainability`] - Feature ranking by information gain
//! - [`utils`] - Loading CSV, JSON and Parquet files into datasets
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```
//! use id3_tree::prelude::*;
//!
//! let data = id3_tree::data::tennis()?;
//! let tree = build_tree(&data, "PlayTennis", &["Outlook", "Humidity", "Wind"])?;
//! assert_eq!(tree.attribute(), Some("Outlook"));
//! # Ok::<(), id3_tree::Id3Error>(())
//! ```

// Core error handling
pub mod error;

// Core ML modules
pub mod data;
pub mod training;
pub mod explainability;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{Id3Error, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Id3Error, Result};

    // Data
    pub use crate::data::{Dataset, Row};

    // Training
    pub use crate::training::{
        build_tree, entropy, information_gain, rank_features, DecisionNode, FeatureGain,
        Id3Builder, Id3Classifier, Id3Config,
    };

    // Explainability
    pub use crate::explainability::{GainOrder, GainReport};

    // Loading
    pub use crate::utils::DataLoader;
}
