//! Model training module
//!
//! Provides ID3 decision tree induction over categorical data:
//! - Entropy and information gain ([`entropy`])
//! - Tree nodes and their nested-mapping form ([`node`])
//! - The tree builder and classifier ([`decision_tree`])

mod config;
pub mod entropy;
pub mod node;
pub mod decision_tree;

pub use config::Id3Config;
pub use entropy::{entropy, information_gain, rank_features, FeatureGain, LabelDistribution};
pub use node::{Branch, DecisionNode, Rule};
pub use decision_tree::{build_tree, select_best, Id3Builder, Id3Classifier, GAIN_TIE_EPSILON};
