//! ID3 decision tree induction
//!
//! The builder greedily splits on the attribute with the highest information
//! gain, removes it from the pool, and repeats on every partition until a
//! partition is pure or the pool is empty. Work is driven by an explicit task
//! stack instead of call recursion, and subtrees are assembled bottom-up from
//! finished children, so nodes are never mutated after construction.
//!
//! Tie-breaking is fixed:
//! - between attributes, the one declared first wins unless another beats it
//!   by more than [`GAIN_TIE_EPSILON`];
//! - between majority labels, the one seen first in row order wins.

use crate::data::{Dataset, Row};
use crate::error::{Id3Error, Result};
use crate::explainability::GainReport;
use crate::training::config::Id3Config;
use crate::training::entropy::{rank_features, FeatureGain, LabelDistribution};
use crate::training::node::{Branch, DecisionNode};
use std::collections::HashSet;
use tracing::{debug, info};

/// Gains closer than this are treated as equal when choosing a split
pub const GAIN_TIE_EPSILON: f64 = 1e-12;

/// Build an ID3 tree over `features`, predicting `target`
pub fn build_tree<S: AsRef<str>>(dataset: &Dataset, target: &str, features: &[S]) -> Result<DecisionNode> {
    Id3Builder::new().build(dataset, target, features)
}

/// Pick the split candidate with the highest gain
///
/// A later candidate only replaces the current best when it wins by more
/// than [`GAIN_TIE_EPSILON`].
pub fn select_best(gains: &[FeatureGain]) -> Option<&FeatureGain> {
    let mut best: Option<&FeatureGain> = None;
    for candidate in gains {
        if best.map_or(true, |b| candidate.gain > b.gain + GAIN_TIE_EPSILON) {
            best = Some(candidate);
        }
    }
    best
}

enum Task {
    Expand {
        data: Dataset,
        pool: Vec<String>,
        depth: usize,
    },
    Assemble {
        attribute: String,
        values: Vec<String>,
    },
}

enum Step {
    Leaf(DecisionNode),
    Split {
        attribute: String,
        partitions: Vec<(String, Dataset)>,
    },
}

/// ID3 tree builder
#[derive(Debug, Clone, Default)]
pub struct Id3Builder {
    /// Maximum number of split levels before the build fails
    pub max_depth: Option<usize>,
}

impl Id3Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the build instead of splitting deeper than `depth` levels
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Induce a tree over `dataset`
    ///
    /// `features` is the initial attribute pool; its order is the tie-break
    /// order for equal gains.
    pub fn build<S: AsRef<str>>(&self, dataset: &Dataset, target: &str, features: &[S]) -> Result<DecisionNode> {
        let pool = validate_inputs(dataset, target, features)?;
        let target_pos = dataset
            .column_position(target)
            .ok_or_else(|| Id3Error::NoTargetColumn(target.to_string()))?;

        let mut tasks = vec![Task::Expand {
            data: dataset.clone(),
            pool,
            depth: 0,
        }];
        let mut finished: Vec<DecisionNode> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Expand { data, pool, depth } => {
                    match self.expand(&data, target, target_pos, &pool, depth)? {
                        Step::Leaf(node) => finished.push(node),
                        Step::Split { attribute, partitions } => {
                            let child_pool: Vec<String> =
                                pool.iter().filter(|a| **a != attribute).cloned().collect();
                            let values = partitions.iter().map(|(v, _)| v.clone()).collect();
                            tasks.push(Task::Assemble { attribute, values });
                            for (_, subset) in partitions.into_iter().rev() {
                                tasks.push(Task::Expand {
                                    data: subset,
                                    pool: child_pool.clone(),
                                    depth: depth + 1,
                                });
                            }
                        }
                    }
                }
                Task::Assemble { attribute, values } => {
                    let start = finished.len().checked_sub(values.len()).ok_or_else(|| {
                        Id3Error::InvalidInput(format!("missing subtrees for '{}'", attribute))
                    })?;
                    let children = finished.split_off(start);
                    let branches = values
                        .into_iter()
                        .zip(children)
                        .map(|(value, node)| Branch { value, node })
                        .collect();
                    finished.push(DecisionNode::Split { attribute, branches });
                }
            }
        }

        let root = finished
            .pop()
            .ok_or_else(|| Id3Error::InvalidInput("tree build produced no root".to_string()))?;

        info!(
            rows = dataset.len(),
            depth = root.depth(),
            leaves = root.n_leaves(),
            splits = root.n_splits(),
            "Built ID3 tree"
        );
        Ok(root)
    }

    fn expand(
        &self,
        data: &Dataset,
        target: &str,
        target_pos: usize,
        pool: &[String],
        depth: usize,
    ) -> Result<Step> {
        let dist = LabelDistribution::from_labels(data.values_at(target_pos));

        if dist.is_empty() {
            return Err(Id3Error::EmptyInput);
        }

        if dist.is_pure() {
            let label = dist.majority().ok_or(Id3Error::EmptyInput)?;
            debug!(depth, rows = data.len(), label, "Pure partition, emitting leaf");
            return Ok(Step::Leaf(DecisionNode::leaf(label)));
        }

        if pool.is_empty() {
            let label = dist.majority().ok_or(Id3Error::EmptyInput)?;
            debug!(depth, rows = data.len(), label, "Attributes exhausted, emitting majority leaf");
            return Ok(Step::Leaf(DecisionNode::leaf(label)));
        }

        if let Some(max_depth) = self.max_depth {
            if depth >= max_depth {
                return Err(Id3Error::DepthLimitExceeded(max_depth));
            }
        }

        let gains = rank_features(data, pool, target)?;
        let best = select_best(&gains).ok_or(Id3Error::EmptyInput)?;
        debug!(
            depth,
            rows = data.len(),
            attribute = %best.feature,
            gain = best.gain,
            "Splitting"
        );

        let attribute = best.feature.clone();
        let partitions = data.partition_by(&attribute)?;
        Ok(Step::Split { attribute, partitions })
    }
}

/// Check a dataset, target and feature list before building or ranking
///
/// Returns the features as an owned pool in declared order.
pub(crate) fn validate_inputs<S: AsRef<str>>(
    dataset: &Dataset,
    target: &str,
    features: &[S],
) -> Result<Vec<String>> {
    if dataset.is_empty() {
        return Err(Id3Error::EmptyDataset);
    }
    if !dataset.has_column(target) {
        return Err(Id3Error::NoTargetColumn(target.to_string()));
    }

    let mut seen = HashSet::new();
    let mut pool = Vec::with_capacity(features.len());
    for feature in features {
        let feature = feature.as_ref();
        if !dataset.has_column(feature) {
            return Err(Id3Error::FeatureNotFound(feature.to_string()));
        }
        if feature == target {
            return Err(Id3Error::InvalidInput(format!(
                "target '{}' cannot also be a feature",
                target
            )));
        }
        if !seen.insert(feature) {
            return Err(Id3Error::InvalidInput(format!("duplicate feature '{}'", feature)));
        }
        pool.push(feature.to_string());
    }
    Ok(pool)
}

/// ID3 classifier: a built tree plus the inputs it was built from
#[derive(Debug, Clone, Default)]
pub struct Id3Classifier {
    root: Option<DecisionNode>,
    target: String,
    features: Vec<String>,
    feature_gains: Vec<FeatureGain>,
    /// Maximum number of split levels
    pub max_depth: Option<usize>,
}

impl Id3Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Fit the tree to `dataset`
    pub fn fit<S: AsRef<str>>(&mut self, dataset: &Dataset, target: &str, features: &[S]) -> Result<&mut Self> {
        let builder = Id3Builder {
            max_depth: self.max_depth,
        };
        let root = builder.build(dataset, target, features)?;

        self.features = features.iter().map(|f| f.as_ref().to_string()).collect();
        self.feature_gains = rank_features(dataset, &self.features, target)?;
        self.target = target.to_string();
        self.root = Some(root);
        Ok(self)
    }

    /// Fit using target and features resolved from `config`
    pub fn fit_with_config(&mut self, dataset: &Dataset, config: &Id3Config) -> Result<&mut Self> {
        let (target, features) = config.resolve(dataset)?;
        if config.max_depth.is_some() {
            self.max_depth = config.max_depth;
        }
        self.fit(dataset, &target, &features)
    }

    /// Predict one row
    pub fn predict_row(&self, row: &Row<'_>) -> Result<&str> {
        self.root.as_ref().ok_or(Id3Error::ModelNotFitted)?.predict(row)
    }

    /// Predict every row of `dataset`
    pub fn predict(&self, dataset: &Dataset) -> Result<Vec<String>> {
        let root = self.root.as_ref().ok_or(Id3Error::ModelNotFitted)?;
        dataset
            .rows()
            .map(|row| root.predict(&row).map(str::to_string))
            .collect()
    }

    /// Fraction of rows whose prediction matches the target column
    pub fn accuracy(&self, dataset: &Dataset) -> Result<f64> {
        if dataset.is_empty() {
            return Err(Id3Error::EmptyDataset);
        }
        let truth = dataset
            .column(&self.target)
            .ok_or_else(|| Id3Error::NoTargetColumn(self.target.clone()))?;
        let predictions = self.predict(dataset)?;
        let correct = predictions
            .iter()
            .zip(truth)
            .filter(|(p, t)| p.as_str() == *t)
            .count();
        Ok(correct as f64 / dataset.len() as f64)
    }

    pub fn tree(&self) -> Option<&DecisionNode> {
        self.root.as_ref()
    }

    pub fn into_tree(self) -> Option<DecisionNode> {
        self.root
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Gains of every feature over the full training set, in declared order
    pub fn feature_gains(&self) -> &[FeatureGain] {
        &self.feature_gains
    }

    pub fn gain_report(&self) -> Result<GainReport> {
        if !self.is_fitted() {
            return Err(Id3Error::ModelNotFitted);
        }
        Ok(GainReport::new(self.target.clone(), self.feature_gains.clone()))
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, DecisionNode::depth)
    }

    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, DecisionNode::n_leaves)
    }

    pub fn n_splits(&self) -> usize {
        self.root.as_ref().map_or(0, DecisionNode::n_splits)
    }
}
