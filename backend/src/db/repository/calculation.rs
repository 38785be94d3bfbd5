//! Calculation run and data point repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::models::{CalculationId, CalculationRun, DataPoint, DataPointId, NewCalculation, PersonId};

/// Selection of stored data points. Every field narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPointFilter {
    pub person_id: Option<PersonId>,
    pub calculation_id: Option<CalculationId>,
    /// Inclusive lower bound on `date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub end_date: Option<NaiveDate>,
    /// Keep only points where at least one cycle is critical.
    #[serde(default)]
    pub critical_only: bool,
}

impl DataPointFilter {
    pub fn for_person(person_id: PersonId) -> Self {
        Self {
            person_id: Some(person_id),
            ..Default::default()
        }
    }

    pub fn for_calculation(calculation_id: CalculationId) -> Self {
        Self {
            calculation_id: Some(calculation_id),
            ..Default::default()
        }
    }

    pub fn between(mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn critical_only(mut self) -> Self {
        self.critical_only = true;
        self
    }

    pub fn matches(&self, point: &DataPoint) -> bool {
        let date = point.date();
        self.person_id.map_or(true, |id| point.person_id == id)
            && self.calculation_id.map_or(true, |id| point.calculation_id == id)
            && self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
            && (!self.critical_only || point.is_any_critical())
    }
}

/// Repository trait for calculation runs and their data points.
///
/// A run and its points are written together: either the whole run becomes
/// visible or nothing does.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CalculationRepository: Send + Sync {
    /// Store a generated series as one run plus one data point per record.
    ///
    /// Before committing, the store re-checks that the person exists, the
    /// series is non-empty and ascending, its metadata matches the records,
    /// `end_date <= target_date`, and every `days_alive` equals the offset
    /// from the person's birthdate and is non-negative.
    ///
    /// # Arguments
    /// * `calculation` - Series plus run metadata
    ///
    /// # Returns
    /// * `Ok(CalculationRun)` - The committed run
    /// * `Err(RepositoryError::NotFound)` - Unknown person
    /// * `Err(RepositoryError::ValidationError)` - An invariant does not hold; nothing was written
    async fn store_calculation(
        &self,
        calculation: &NewCalculation,
    ) -> RepositoryResult<CalculationRun>;

    async fn get_calculation(
        &self,
        calculation_id: CalculationId,
    ) -> RepositoryResult<CalculationRun>;

    /// List runs newest first, optionally for one person.
    async fn list_calculations(
        &self,
        person_id: Option<PersonId>,
    ) -> RepositoryResult<Vec<CalculationRun>>;

    /// Delete a run and all of its data points.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of data points removed
    /// * `Err(RepositoryError::NotFound)` - Unknown run
    async fn delete_calculation(&self, calculation_id: CalculationId) -> RepositoryResult<usize>;

    /// Data points matching `filter`, ordered by date then id.
    async fn list_data_points(&self, filter: &DataPointFilter) -> RepositoryResult<Vec<DataPoint>>;

    async fn get_data_point(&self, data_point_id: DataPointId) -> RepositoryResult<DataPoint>;

    async fn count_data_points(&self) -> RepositoryResult<usize>;
}
