use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::algorithms::analysis::{CRITICAL_DAYS_ANALYSIS, STATISTICS_ANALYSIS};
use crate::db::repository::DataPointFilter;
use crate::error::{BiorhythmError, BiorhythmResult};
use crate::models::{AnalysisParameters, PersonId};

// =========================================================
// Analysis types + routes
// =========================================================

fn default_analysis_type() -> String {
    STATISTICS_ANALYSIS.to_string()
}

/// Request to aggregate a person's points over a range and freeze the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub person_id: PersonId,
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Extra configuration recorded verbatim on the stored record.
    #[serde(default)]
    pub parameters: AnalysisParameters,
}

impl AnalysisRequest {
    pub fn new(person_id: PersonId, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            person_id,
            analysis_type: default_analysis_type(),
            start_date,
            end_date,
            parameters: AnalysisParameters::new(),
        }
    }

    pub fn with_type(mut self, analysis_type: impl Into<String>) -> Self {
        self.analysis_type = analysis_type.into();
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Only critical days are aggregated for the `critical_days` type or when
    /// the `critical_only` parameter is `true`.
    pub fn critical_only(&self) -> bool {
        self.analysis_type == CRITICAL_DAYS_ANALYSIS
            || self
                .parameters
                .get("critical_only")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
    }

    pub fn validate(&self) -> BiorhythmResult<()> {
        if self.analysis_type.trim().is_empty() {
            return Err(BiorhythmError::InvalidRequest(
                "analysis_type must not be empty".to_string(),
            ));
        }
        if self.start_date > self.end_date {
            return Err(BiorhythmError::InvalidRequest(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    pub fn to_filter(&self) -> DataPointFilter {
        DataPointFilter {
            person_id: Some(self.person_id),
            calculation_id: None,
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            critical_only: self.critical_only(),
        }
    }
}

pub const RUN_ANALYSIS: &str = "run_analysis";
pub const LIST_ANALYSES: &str = "list_analyses";
pub const GET_ANALYSIS: &str = "get_analysis";
pub const DELETE_ANALYSIS: &str = "delete_analysis";
