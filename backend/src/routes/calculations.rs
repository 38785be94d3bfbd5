use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::algorithms::timeseries::range_ending_on;
use crate::config::CalculationSettings;
use crate::error::{BiorhythmError, BiorhythmResult};
use crate::models::{CalculationRun, PersonId};

// =========================================================
// Calculation types + routes
// =========================================================

/// Request to generate and store a new calculation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub person_id: PersonId,
    /// Number of days to generate; defaults to `calculation.default_days`.
    #[serde(default)]
    pub days: Option<u32>,
    /// Last day of the run; defaults to the caller's "today".
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A request with defaults applied and its date range fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCalculation {
    pub person_id: PersonId,
    pub days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_date: NaiveDate,
    pub notes: String,
}

impl CalculationRequest {
    pub fn new(person_id: PersonId) -> Self {
        Self {
            person_id,
            days: None,
            target_date: None,
            notes: None,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    pub fn with_target_date(mut self, target_date: NaiveDate) -> Self {
        self.target_date = Some(target_date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Apply defaults and validate the day count.
    ///
    /// The resolved range covers `days` days ending on the target date:
    /// `[target - (days - 1), target]`.
    ///
    /// # Arguments
    /// * `today` - Default target date when the request has none
    /// * `settings` - Default and maximum day counts
    ///
    /// # Returns
    /// * `Ok(ResolvedCalculation)` - Range ready for generation
    /// * `Err(BiorhythmError::InvalidRequest)` - `days` outside `1..=max_days`
    pub fn resolve(
        &self,
        today: NaiveDate,
        settings: &CalculationSettings,
    ) -> BiorhythmResult<ResolvedCalculation> {
        let days = self.days.unwrap_or(settings.default_days);
        if days < 1 || days > settings.max_days {
            return Err(BiorhythmError::InvalidRequest(format!(
                "days must be between 1 and {}, got {}",
                settings.max_days, days
            )));
        }

        let target_date = self.target_date.unwrap_or(today);
        let (start_date, end_date) = range_ending_on(target_date, days)?;

        Ok(ResolvedCalculation {
            person_id: self.person_id,
            days,
            start_date,
            end_date,
            target_date,
            notes: self.notes.clone().unwrap_or_default(),
        })
    }
}

/// Result of a successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub message: String,
    pub calculation: CalculationRun,
    pub data_points_created: usize,
}

impl CalculationOutcome {
    pub fn new(calculation: CalculationRun) -> Self {
        Self {
            message: "Biorhythm calculation completed successfully".to_string(),
            data_points_created: calculation.days_calculated,
            calculation,
        }
    }
}

pub const CALCULATE: &str = "calculate";
pub const LIST_CALCULATIONS: &str = "list_calculations";
pub const GET_CALCULATION: &str = "get_calculation";
pub const DELETE_CALCULATION: &str = "delete_calculation";
