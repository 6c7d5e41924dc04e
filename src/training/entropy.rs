//! Shannon entropy and information gain over categorical labels
//!
//! Everything here is a pure function of a [`Dataset`] view. Label counts are
//! kept in first-seen order so that every derived quantity (including the
//! majority label) is reproducible for a given row order.

use crate::data::Dataset;
use crate::error::{Id3Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Occurrence count of each distinct label in a sequence
#[derive(Debug, Clone, Default)]
pub struct LabelDistribution<'a> {
    order: Vec<&'a str>,
    counts: HashMap<&'a str, usize>,
    total: usize,
}

impl<'a> LabelDistribution<'a> {
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut dist = Self::default();
        for label in labels {
            let count = dist.counts.entry(label).or_insert(0);
            if *count == 0 {
                dist.order.push(label);
            }
            *count += 1;
            dist.total += 1;
        }
        dist
    }

    /// Distribution of the `target` column of a dataset view
    pub fn of_column(dataset: &'a Dataset, target: &str) -> Result<Self> {
        let pos = dataset
            .column_position(target)
            .ok_or_else(|| Id3Error::NoTargetColumn(target.to_string()))?;
        Ok(Self::from_labels(dataset.values_at(pos)))
    }

    /// Total number of labels counted
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct labels
    pub fn n_distinct(&self) -> usize {
        self.order.len()
    }

    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// True when at most one distinct label is present
    pub fn is_pure(&self) -> bool {
        self.order.len() <= 1
    }

    /// `(label, count)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, usize)> + '_ {
        self.order.iter().map(move |&l| (l, self.counts[l]))
    }

    /// Most frequent label; ties go to the label seen first
    pub fn majority(&self) -> Option<&'a str> {
        let mut best: Option<(&'a str, usize)> = None;
        for (label, count) in self.iter() {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }

    /// Shannon entropy in bits
    pub fn entropy(&self) -> Result<f64> {
        if self.total == 0 {
            return Err(Id3Error::EmptyInput);
        }
        let n = self.total as f64;
        let mut entropy = 0.0;
        for (_, count) in self.iter() {
            let p = count as f64 / n;
            entropy -= p * p.log2();
        }
        Ok(entropy)
    }
}

/// Shannon entropy (bits) of a label sequence
///
/// Zero exactly when all labels are identical, `log2(k)` for `k` equally
/// frequent labels. Fails with [`Id3Error::EmptyInput`] on an empty slice.
pub fn entropy(labels: &[&str]) -> Result<f64> {
    LabelDistribution::from_labels(labels.iter().copied()).entropy()
}

/// Reduction in target entropy obtained by partitioning on `attribute`
///
/// Computed as `H(target) - Σ |Dv|/|D| · H(target | Dv)` over the distinct
/// values `v` of `attribute` observed in `dataset`.
pub fn information_gain(dataset: &Dataset, attribute: &str, target: &str) -> Result<f64> {
    if dataset.is_empty() {
        return Err(Id3Error::EmptyInput);
    }
    let target_pos = dataset
        .column_position(target)
        .ok_or_else(|| Id3Error::NoTargetColumn(target.to_string()))?;

    let total_entropy = LabelDistribution::from_labels(dataset.values_at(target_pos)).entropy()?;

    let n = dataset.len() as f64;
    let mut weighted_entropy = 0.0;
    for (_, subset) in dataset.partition_by(attribute)? {
        let weight = subset.len() as f64 / n;
        weighted_entropy +=
            weight * LabelDistribution::from_labels(subset.values_at(target_pos)).entropy()?;
    }

    Ok(total_entropy - weighted_entropy)
}

/// Information gain of a single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGain {
    pub feature: String,
    pub gain: f64,
}

/// Information gain of every feature, in the order the features were given
pub fn rank_features<S>(dataset: &Dataset, features: &[S], target: &str) -> Result<Vec<FeatureGain>>
where
    S: AsRef<str> + Sync,
{
    features
        .par_iter()
        .map(|feature| {
            let feature = feature.as_ref();
            information_gain(dataset, feature, target).map(|gain| FeatureGain {
                feature: feature.to_string(),
                gain,
            })
        })
        .collect()
}
