//! Feature importance by information gain

use crate::error::{Id3Error, Result};
use crate::training::{select_best, FeatureGain};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Presentation order of a gain report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GainOrder {
    /// Lowest gain first (bar-chart order)
    #[default]
    Ascending,
    /// Highest gain first
    Descending,
    /// Order the features were declared in
    Declared,
}

impl FromStr for GainOrder {
    type Err = Id3Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(GainOrder::Ascending),
            "desc" | "descending" => Ok(GainOrder::Descending),
            "declared" | "none" => Ok(GainOrder::Declared),
            other => Err(Id3Error::ConfigError(format!("unknown gain order '{}'", other))),
        }
    }
}

/// Per-feature information gain, relative to one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainReport {
    pub target: String,
    pub gains: Vec<FeatureGain>,
}

impl GainReport {
    pub fn new(target: impl Into<String>, gains: Vec<FeatureGain>) -> Self {
        Self {
            target: target.into(),
            gains,
        }
    }

    /// Copy of the report with gains in the requested order
    ///
    /// Sorting is stable, so equal gains keep their declared order.
    pub fn sorted(&self, order: GainOrder) -> GainReport {
        let mut gains = self.gains.clone();
        match order {
            GainOrder::Ascending => gains.sort_by(|a, b| a.gain.total_cmp(&b.gain)),
            GainOrder::Descending => gains.sort_by(|a, b| b.gain.total_cmp(&a.gain)),
            GainOrder::Declared => {}
        }
        GainReport {
            target: self.target.clone(),
            gains,
        }
    }

    /// Highest-gain feature, chosen the same way the builder picks a split
    pub fn best(&self) -> Option<&FeatureGain> {
        select_best(&self.gains)
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.gains.iter().find(|g| g.feature == feature).map(|g| g.gain)
    }

    pub fn max_gain(&self) -> f64 {
        self.gains.iter().map(|g| g.gain).fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.gains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
