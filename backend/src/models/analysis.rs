//! Frozen analysis results.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AnalysisId, PersonId};
use crate::algorithms::statistics::Statistics;

/// Configuration an analysis was produced with. Ordered so that the canonical
/// JSON form (and its checksum) is stable.
pub type AnalysisParameters = BTreeMap<String, serde_json::Value>;

/// Immutable, reusable aggregation result for one person.
///
/// `id` is `None` until the record has been stored. Re-running the same
/// analysis creates a new record rather than updating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Option<AnalysisId>,
    pub person_id: PersonId,
    pub analysis_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub analysis_date: DateTime<Utc>,
    pub results: Statistics,
    pub summary: String,
    pub data_points_analyzed: usize,
    pub analysis_parameters: AnalysisParameters,
    /// SHA-256 of the canonical inputs (person, type, range, parameters, points).
    #[serde(default)]
    pub input_checksum: Option<String>,
}

impl AnalysisRecord {
    pub fn date_range_str(&self) -> String {
        format!("{} to {}", self.start_date, self.end_date)
    }

    pub fn with_input_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.input_checksum = Some(checksum.into());
        self
    }
}
