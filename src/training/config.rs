//! Training configuration

use crate::data::Dataset;
use crate::error::{Id3Error, Result};
use crate::explainability::GainOrder;
use crate::training::decision_tree::validate_inputs;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for building an ID3 tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Id3Config {
    /// Target column name (None = last column)
    pub target_column: Option<String>,

    /// Feature column names (None = all except target)
    pub feature_columns: Option<Vec<String>>,

    /// Hard cap on split depth; exceeding it is an error, not a prune
    pub max_depth: Option<usize>,

    /// Order used when presenting feature gains
    pub gain_order: GainOrder,
}

impl Id3Config {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target_column: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = Some(target.into());
        self
    }

    pub fn with_features<S: Into<String>>(mut self, features: Vec<S>) -> Self {
        self.feature_columns = Some(features.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_gain_order(mut self, order: GainOrder) -> Self {
        self.gain_order = order;
        self
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Id3Error::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Target column to use for `dataset`
    pub fn resolve_target(&self, dataset: &Dataset) -> Result<String> {
        match &self.target_column {
            Some(target) if dataset.has_column(target) => Ok(target.clone()),
            Some(target) => Err(Id3Error::NoTargetColumn(target.clone())),
            None => dataset
                .columns()
                .last()
                .cloned()
                .ok_or_else(|| Id3Error::InvalidInput("dataset has no columns".to_string())),
        }
    }

    /// Feature columns to use for `dataset` given the resolved target
    pub fn resolve_features(&self, dataset: &Dataset, target: &str) -> Vec<String> {
        match &self.feature_columns {
            Some(features) => features.clone(),
            None => dataset
                .columns()
                .iter()
                .filter(|c| c.as_str() != target)
                .cloned()
                .collect(),
        }
    }

    /// Resolve target and features for `dataset` and check them
    ///
    /// Fails with `EmptyDataset` on a view with no rows, and with `InvalidInput`
    /// when the target is listed among the features or a feature repeats.
    pub fn resolve(&self, dataset: &Dataset) -> Result<(String, Vec<String>)> {
        let target = self.resolve_target(dataset)?;
        let features = self.resolve_features(dataset, &target);
        let features = validate_inputs(dataset, &target, &features)?;
        Ok((target, features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tennis;
    use std::io::Write;

    #[test]
    fn test_defaults_follow_column_order() {
        let ds = tennis().unwrap();
        let config = Id3Config::default();
        let target = config.resolve_target(&ds).unwrap();
        assert_eq!(target, "PlayTennis");
        assert_eq!(
            config.resolve_features(&ds, &target),
            vec!["Outlook", "Humidity", "Wind"]
        );
    }

    #[test]
    fn test_explicit_target_and_features() {
        let ds = tennis().unwrap();
        let config = Id3Config::new("Wind").with_features(vec!["Outlook"]);
        let target = config.resolve_target(&ds).unwrap();
        assert_eq!(target, "Wind");
        assert_eq!(config.resolve_features(&ds, &target), vec!["Outlook"]);
    }

    #[test]
    fn test_unknown_target() {
        let ds = tennis().unwrap();
        let config = Id3Config::new("Temperature");
        assert!(matches!(config.resolve_target(&ds), Err(Id3Error::NoTargetColumn(_))));
    }

    #[test]
    fn test_resolve_checks_inputs() {
        let ds = tennis().unwrap();
        let (target, features) = Id3Config::default().resolve(&ds).unwrap();
        assert_eq!(target, "PlayTennis");
        assert_eq!(features, vec!["Outlook", "Humidity", "Wind"]);

        let config = Id3Config::new("PlayTennis").with_features(vec!["PlayTennis", "Outlook"]);
        assert!(matches!(config.resolve(&ds), Err(Id3Error::InvalidInput(_))));

        let empty = ds.filter_rows(|_| false);
        assert!(matches!(
            Id3Config::default().resolve(&empty),
            Err(Id3Error::EmptyDataset)
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(
            file,
            r#"{{"target_column": "PlayTennis", "max_depth": 3, "gain_order": "descending"}}"#
        )
        .unwrap();

        let config = Id3Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.target_column.as_deref(), Some("PlayTennis"));
        assert_eq!(config.feature_columns, None);
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.gain_order, GainOrder::Descending);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"max_depth": "deep"}}"#).unwrap();
        assert!(matches!(
            Id3Config::from_json_file(file.path()),
            Err(Id3Error::ConfigError(_))
        ));
    }
}
