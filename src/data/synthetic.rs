//! Built-in demo data

use super::Dataset;
use crate::error::Result;

/// Name of the label column in [`tennis`]
pub const TENNIS_TARGET: &str = "PlayTennis";

/// Feature columns of [`tennis`] in declared order
pub const TENNIS_FEATURES: [&str; 3] = ["Outlook", "Humidity", "Wind"];

/// The 11-row weather table used as the default demo dataset
///
/// Columns are `Outlook`, `Humidity`, `Wind` and the label `PlayTennis`
/// (7 "yes", 4 "no").
pub fn tennis() -> Result<Dataset> {
    Dataset::from_columns(vec![
        (
            "Outlook",
            vec![
                "sunny", "sunny", "overcast", "rain", "rain", "overcast", "sunny", "sunny",
                "overcast", "rain", "overcast",
            ],
        ),
        (
            "Humidity",
            vec![
                "high", "normal", "high", "normal", "high", "high", "normal", "normal", "normal",
                "normal", "normal",
            ],
        ),
        (
            "Wind",
            vec![
                "weak", "strong", "weak", "weak", "strong", "strong", "weak", "weak", "weak",
                "strong", "strong",
            ],
        ),
        (
            TENNIS_TARGET,
            vec!["no", "no", "yes", "yes", "yes", "no", "yes", "no", "yes", "yes", "yes"],
        ),
    ])
}
