use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::people::PersonSummary;
use crate::algorithms::timeseries::DayRecord;
use crate::db::repository::DataPointFilter;
use crate::models::{DataPoint, Person};

// =========================================================
// Per-person time series types + route
// =========================================================

/// Filters for a person's stored series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeseriesQuery {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Maximum number of points returned; `Some(0)` means no limit.
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub critical_only: bool,
}

impl TimeseriesQuery {
    pub fn to_filter(&self, person: &Person) -> DataPointFilter {
        DataPointFilter {
            person_id: Some(person.id),
            calculation_id: None,
            start_date: self.start_date,
            end_date: self.end_date,
            critical_only: self.critical_only,
        }
    }
}

/// First and last date of the matching points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// A person's stored biorhythm points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonTimeseries {
    pub person: PersonSummary,
    /// Number of points returned (after `limit`).
    pub data_points: usize,
    /// Range of all matching points, computed before `limit` is applied.
    pub date_range: DateRange,
    pub biorhythm_data: Vec<DayRecord>,
}

impl PersonTimeseries {
    /// Build the response from date-ordered points.
    pub fn from_points(person: &Person, points: &[DataPoint], limit: Option<usize>) -> Self {
        let date_range = DateRange {
            start: points.first().map(DataPoint::date),
            end: points.last().map(DataPoint::date),
        };
        let take = match limit {
            Some(n) if n > 0 => n,
            _ => points.len(),
        };
        let biorhythm_data: Vec<DayRecord> = points.iter().take(take).map(|p| p.record).collect();

        Self {
            person: PersonSummary::from(person),
            data_points: biorhythm_data.len(),
            date_range,
            biorhythm_data,
        }
    }
}

pub const GET_BIORHYTHM_DATA: &str = "get_biorhythm_data";
