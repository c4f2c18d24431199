//! Normalized record types shared by extraction, storage and the pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the ranking table after normalization (e.g. a museum).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntityRecord {
    /// Display name of the ranked entity.
    pub name: String,

    /// Group (city) as displayed in the table.
    pub group_label: String,

    /// Canonical join identifier for the group.
    pub group_key: Option<String>,

    /// Category (country), when the table has such a column.
    pub category_label: Option<String>,

    /// The ranked quantity (annual visitors).
    pub magnitude: Option<u64>,

    /// Year the magnitude refers to.
    pub period: Option<i32>,

    /// Where the record was recovered from.
    pub provenance_url: String,
}

impl RankedEntityRecord {
    /// Join key, falling back to the slugified display label.
    pub fn join_key(&self) -> Option<String> {
        self.group_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| crate::extract::slugify_group(&self.group_label))
    }

    /// Whether the record is kept under the given inclusion threshold.
    pub fn meets_threshold(&self, threshold: u64) -> bool {
        self.magnitude.is_some_and(|m| m >= threshold)
    }
}

/// One knowledge-graph fact about an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityStatement {
    pub entity_id: String,
    pub quantity: Option<u64>,
    pub as_of: Option<NaiveDate>,
}

/// Which tier of the fallback chain produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Fetched from the upstream source during this run.
    Live,
    /// Recovered from an earlier successful fetch.
    Cache,
    /// Shipped with the binary.
    Bundled,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Live => write!(f, "live"),
            Provenance::Cache => write!(f, "cache"),
            Provenance::Bundled => write!(f, "bundled"),
        }
    }
}

/// Best quantity found for a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuantity {
    /// Human-readable label of the entity.
    pub label: String,

    /// Stable identifier in the knowledge graph (empty for curated values).
    pub entity_id: String,

    /// The selected quantity (population).
    pub quantity: u64,

    /// Point in time of the quantity, when the statement carried one.
    pub as_of: Option<NaiveDate>,

    /// The key the lookup was made with.
    pub source_key: String,

    /// Tier of the fallback chain that produced this value.
    pub provenance: Provenance,
}

/// One joined row of the feature table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub name: String,
    pub group_label: String,
    pub category_label: Option<String>,
    pub magnitude: u64,
    pub period: Option<i32>,
    pub quantity: u64,
    pub as_of: Option<NaiveDate>,
}

/// Metadata of one fitted regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// UTC timestamp version, `%Y%m%d%H%M%S`.
    pub version: String,

    /// Slope of log(visitors) on log(population).
    pub coefficient: f64,

    /// Intercept in log space.
    pub intercept: f64,

    /// Coefficient of determination, original space.
    pub r2: f64,

    /// Root mean squared error, original space.
    pub rmse: f64,

    /// Mean absolute error, original space.
    pub mae: f64,

    /// Number of rows the model was fitted on.
    pub n_samples: usize,

    pub trained_at: DateTime<Utc>,
}

impl ModelMetadata {
    /// Predicted visitors for a population, clamped at zero.
    pub fn predict(&self, population: u64) -> u64 {
        if population == 0 {
            return 0;
        }
        let log_pred = self.intercept + self.coefficient * (population as f64).ln();
        let pred = log_pred.exp();
        if pred.is_finite() && pred > 0.0 {
            pred as u64
        } else {
            0
        }
    }

    /// Fitted equation in human-readable form.
    pub fn equation(&self) -> String {
        format!(
            "log(visitors) = {:.4} * log(population) + {:.4}",
            self.coefficient, self.intercept
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(group_label: &str, group_key: Option<&str>) -> RankedEntityRecord {
        RankedEntityRecord {
            name: "Museum".to_string(),
            group_label: group_label.to_string(),
            group_key: group_key.map(str::to_string),
            category_label: None,
            magnitude: Some(2_500_000),
            period: None,
            provenance_url: String::new(),
        }
    }

    #[test]
    fn test_join_key_prefers_group_key() {
        assert_eq!(
            record("Washington, D.C.", Some("Washington,_D.C.")).join_key(),
            Some("Washington,_D.C.".to_string())
        );
        assert_eq!(
            record("New York City", None).join_key(),
            Some("New_York_City".to_string())
        );
        assert_eq!(record("", Some("")).join_key(), None);
    }

    #[test]
    fn test_meets_threshold() {
        let mut r = record("Paris", Some("Paris"));
        assert!(r.meets_threshold(2_000_000));
        assert!(!r.meets_threshold(3_000_000));
        r.magnitude = None;
        assert!(!r.meets_threshold(0));
    }

    #[test]
    fn test_predict_power_law() {
        let model = ModelMetadata {
            version: "20240101000000".to_string(),
            coefficient: 1.0,
            intercept: 0.0,
            r2: 1.0,
            rmse: 0.0,
            mae: 0.0,
            n_samples: 2,
            trained_at: Utc::now(),
        };
        let predicted = model.predict(1_000_000);
        assert!((999_990..=1_000_010).contains(&predicted));
        assert_eq!(model.predict(0), 0);
        assert_eq!(model.equation(), "log(visitors) = 1.0000 * log(population) + 0.0000");
    }
}
