//! Calculation runs and the data points they own.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CalculationId, DataPointId, PersonId};
use crate::algorithms::cycles::Cycle;
use crate::algorithms::timeseries::{DayRecord, TimeSeries};

/// One invocation of the generator for one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRun {
    pub id: CalculationId,
    pub person_id: PersonId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_date: NaiveDate,
    pub days_calculated: usize,
    pub generator_version: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl CalculationRun {
    /// Human readable span, e.g. `2024-01-01 to 2024-12-31`.
    pub fn date_range_str(&self) -> String {
        format!("{} to {}", self.start_date, self.end_date)
    }
}

/// A generated series ready to be written as one run.
///
/// Run metadata (`start_date`, `end_date`, `days_calculated`, generator
/// version) is taken from the series itself so it cannot disagree with the
/// points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalculation {
    pub person_id: PersonId,
    pub target_date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub series: TimeSeries,
}

impl NewCalculation {
    pub fn new(
        person_id: PersonId,
        target_date: NaiveDate,
        series: TimeSeries,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            person_id,
            target_date,
            notes: String::new(),
            created_at,
            series,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// A persisted day of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: DataPointId,
    pub person_id: PersonId,
    pub calculation_id: CalculationId,
    #[serde(flatten)]
    pub record: DayRecord,
    pub created_at: DateTime<Utc>,
}

impl DataPoint {
    pub fn date(&self) -> NaiveDate {
        self.record.date
    }

    pub fn critical_cycles(&self) -> Vec<Cycle> {
        self.record.critical_cycles()
    }

    pub fn is_any_critical(&self) -> bool {
        self.record.is_any_critical()
    }
}
