//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in memory using HashMap
//! tables plus parent-to-children id indexes, providing fast, deterministic, and isolated execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::algorithms::cycles::Cycle;
use crate::db::repository::*;
use crate::models::{
    AnalysisId, AnalysisRecord, CalculationId, CalculationRun, DataPoint, DataPointId,
    NewCalculation, NewPerson, Person, PersonId, PersonUpdate,
};

/// In-memory local repository.
///
/// Cloning the repository shares the underlying data, so clones observe each
/// other's writes.
///
/// # Example
/// ```
/// use biorhythm_engine::db::repositories::LocalRepository;
/// use biorhythm_engine::db::repository::PersonRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// assert!(repo.health_check().await.unwrap());
/// assert_eq!(repo.count_people().await.unwrap(), 0);
/// # });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    people: HashMap<PersonId, Person>,
    calculations: HashMap<CalculationId, CalculationRun>,
    data_points: HashMap<DataPointId, DataPoint>,
    analyses: HashMap<AnalysisId, AnalysisRecord>,

    // Parent -> children indexes
    person_calculations: HashMap<PersonId, BTreeSet<CalculationId>>,
    calculation_points: HashMap<CalculationId, Vec<DataPointId>>,
    person_analyses: HashMap<PersonId, BTreeSet<AnalysisId>>,

    // ID counters
    next_person_id: i64,
    next_calculation_id: i64,
    next_data_point_id: i64,
    next_analysis_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            people: HashMap::new(),
            calculations: HashMap::new(),
            data_points: HashMap::new(),
            analyses: HashMap::new(),
            person_calculations: HashMap::new(),
            calculation_points: HashMap::new(),
            person_analyses: HashMap::new(),
            next_person_id: 1,
            next_calculation_id: 1,
            next_data_point_id: 1,
            next_analysis_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.is_healthy {
            return Err(RepositoryError::connection("Store is not healthy"));
        }
        Ok(())
    }

    fn person(&self, person_id: PersonId) -> RepositoryResult<&Person> {
        self.people.get(&person_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Person {} not found", person_id),
                ErrorContext::new("get_person")
                    .with_entity("person")
                    .with_entity_id(person_id),
            )
        })
    }

    fn has_data_points(&self, person_id: PersonId) -> bool {
        self.person_calculations
            .get(&person_id)
            .is_some_and(|runs| {
                runs.iter().any(|run| {
                    self.calculation_points
                        .get(run)
                        .is_some_and(|points| !points.is_empty())
                })
            })
    }

    /// Remove a run and its points, returning the number of points removed.
    fn remove_calculation(&mut self, calculation_id: CalculationId) -> Option<usize> {
        let run = self.calculations.remove(&calculation_id)?;
        if let Some(runs) = self.person_calculations.get_mut(&run.person_id) {
            runs.remove(&calculation_id);
        }
        let point_ids = self
            .calculation_points
            .remove(&calculation_id)
            .unwrap_or_default();
        for point_id in &point_ids {
            self.data_points.remove(point_id);
        }
        Some(point_ids.len())
    }

    /// Candidate point ids for a filter, narrowed through the indexes.
    fn candidate_points(&self, filter: &DataPointFilter) -> Vec<DataPointId> {
        if let Some(calculation_id) = filter.calculation_id {
            return self
                .calculation_points
                .get(&calculation_id)
                .cloned()
                .unwrap_or_default();
        }
        if let Some(person_id) = filter.person_id {
            return self
                .person_calculations
                .get(&person_id)
                .into_iter()
                .flatten()
                .filter_map(|run| self.calculation_points.get(run))
                .flatten()
                .copied()
                .collect();
        }
        self.data_points.keys().copied().collect()
    }
}

/// Re-check the run invariants against the owning person.
fn validate_calculation(person: &Person, calculation: &NewCalculation) -> RepositoryResult<()> {
    let context = || {
        ErrorContext::new("store_calculation")
            .with_entity("person")
            .with_entity_id(person.id)
    };
    let reject = |message: String| RepositoryError::validation_with_context(message, context());

    let series = &calculation.series;
    let (first, last) = match (series.data.first(), series.data.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(reject("Calculation has no data points".to_string())),
    };

    if series.meta.days != series.data.len() {
        return Err(reject(format!(
            "Series reports {} days but carries {} records",
            series.meta.days,
            series.data.len()
        )));
    }
    if series.meta.start_date != first.date || series.meta.end_date != last.date {
        return Err(reject(format!(
            "Series range {} to {} does not match its records ({} to {})",
            series.meta.start_date, series.meta.end_date, first.date, last.date
        )));
    }
    if series.meta.birthdate != person.birthdate {
        return Err(reject(format!(
            "Series was generated for birthdate {}, person has {}",
            series.meta.birthdate, person.birthdate
        )));
    }
    if last.date > calculation.target_date {
        return Err(reject(format!(
            "End date {} is after target date {}",
            last.date, calculation.target_date
        )));
    }
    if let Some(pair) = series.data.windows(2).find(|w| w[0].date >= w[1].date) {
        return Err(reject(format!(
            "Records are not strictly ascending at {}",
            pair[1].date
        )));
    }

    for record in &series.data {
        let expected = person.days_alive_on(record.date);
        if record.days_alive != expected {
            return Err(reject(format!(
                "Record {} has days_alive {} but expected {}",
                record.date, record.days_alive, expected
            )));
        }
        if record.days_alive < 0 {
            return Err(reject(format!(
                "Record {} is before the birthdate {}",
                record.date, person.birthdate
            )));
        }
        if let Some(cycle) = Cycle::ALL
            .into_iter()
            .find(|c| !(-1.0..=1.0).contains(&record.value(*c)))
        {
            return Err(reject(format!(
                "Record {} has {} value {} outside [-1, 1]",
                record.date,
                cycle,
                record.value(cycle)
            )));
        }
    }

    Ok(())
}

fn validate_name(name: &str, operation: &str) -> RepositoryResult<()> {
    if name.trim().is_empty() {
        return Err(RepositoryError::validation_with_context(
            "Person name must not be empty",
            ErrorContext::new(operation).with_entity("person"),
        ));
    }
    Ok(())
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository. Health status is kept.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of calculation runs stored.
    pub fn calculation_count(&self) -> usize {
        self.data.read().calculations.len()
    }

    /// Get the number of analysis records stored.
    pub fn analysis_count(&self) -> usize {
        self.data.read().analyses.len()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersonRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_person(
        &self,
        person: &NewPerson,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Person> {
        validate_name(&person.name, "create_person")?;

        let mut data = self.data.write();
        data.check_health()?;

        let id = PersonId::new(data.next_person_id);
        data.next_person_id += 1;

        let stored = Person {
            id,
            name: person.name.clone(),
            birthdate: person.birthdate,
            email: person.email.clone(),
            notes: person.notes.clone(),
            created_at,
            updated_at: created_at,
        };
        data.people.insert(id, stored.clone());
        debug!("Stored person {} ({})", id, stored.name);
        Ok(stored)
    }

    async fn get_person(&self, person_id: PersonId) -> RepositoryResult<Person> {
        let data = self.data.read();
        data.check_health()?;
        data.person(person_id).cloned()
    }

    async fn list_people(&self, search: Option<&str>) -> RepositoryResult<Vec<Person>> {
        let data = self.data.read();
        data.check_health()?;

        let needle = search.map(str::trim).filter(|s| !s.is_empty());
        let mut people: Vec<Person> = data
            .people
            .values()
            .filter(|p| needle.map_or(true, |n| p.matches_search(n)))
            .cloned()
            .collect();
        people.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(people)
    }

    async fn update_person(
        &self,
        person_id: PersonId,
        update: &PersonUpdate,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<Person> {
        if let Some(name) = &update.name {
            validate_name(name, "update_person")?;
        }

        let mut data = self.data.write();
        data.check_health()?;

        let current = data.person(person_id)?.birthdate;
        if let Some(birthdate) = update.birthdate {
            if birthdate != current && data.has_data_points(person_id) {
                return Err(RepositoryError::validation_with_context(
                    format!(
                        "Birthdate of person {} cannot change while data points reference it",
                        person_id
                    ),
                    ErrorContext::new("update_person")
                        .with_entity("person")
                        .with_entity_id(person_id),
                ));
            }
        }

        let person = data
            .people
            .get_mut(&person_id)
            .ok_or_else(|| RepositoryError::not_found(format!("Person {} not found", person_id)))?;
        update.apply_to(person, updated_at);
        Ok(person.clone())
    }

    async fn delete_person(&self, person_id: PersonId) -> RepositoryResult<()> {
        let mut data = self.data.write();
        data.check_health()?;
        data.person(person_id)?;

        let runs = data.person_calculations.remove(&person_id).unwrap_or_default();
        let mut points_removed = 0;
        for run in runs {
            points_removed += data.remove_calculation(run).unwrap_or(0);
        }
        let analyses = data.person_analyses.remove(&person_id).unwrap_or_default();
        for analysis in &analyses {
            data.analyses.remove(analysis);
        }
        data.people.remove(&person_id);

        debug!(
            "Deleted person {} with {} data points and {} analyses",
            person_id,
            points_removed,
            analyses.len()
        );
        Ok(())
    }

    async fn count_people(&self) -> RepositoryResult<usize> {
        let data = self.data.read();
        data.check_health()?;
        Ok(data.people.len())
    }
}

#[async_trait]
impl CalculationRepository for LocalRepository {
    async fn store_calculation(
        &self,
        calculation: &NewCalculation,
    ) -> RepositoryResult<CalculationRun> {
        // Validation and insertion happen under one write lock so a run and its
        // points appear together or not at all.
        let mut data = self.data.write();
        data.check_health()?;

        let person = data
            .person(calculation.person_id)
            .map_err(|e| e.with_operation("store_calculation"))?;
        validate_calculation(person, calculation)?;

        let series = &calculation.series;
        let calculation_id = CalculationId::new(data.next_calculation_id);
        data.next_calculation_id += 1;

        let mut point_ids = Vec::with_capacity(series.len());
        for record in &series.data {
            let point_id = DataPointId::new(data.next_data_point_id);
            data.next_data_point_id += 1;
            data.data_points.insert(
                point_id,
                DataPoint {
                    id: point_id,
                    person_id: calculation.person_id,
                    calculation_id,
                    record: *record,
                    created_at: calculation.created_at,
                },
            );
            point_ids.push(point_id);
        }

        let run = CalculationRun {
            id: calculation_id,
            person_id: calculation.person_id,
            start_date: series.meta.start_date,
            end_date: series.meta.end_date,
            target_date: calculation.target_date,
            days_calculated: point_ids.len(),
            generator_version: series.meta.generator_version.clone(),
            notes: calculation.notes.clone(),
            created_at: calculation.created_at,
        };

        data.calculation_points.insert(calculation_id, point_ids);
        data.person_calculations
            .entry(calculation.person_id)
            .or_default()
            .insert(calculation_id);
        data.calculations.insert(calculation_id, run.clone());

        debug!(
            "Stored calculation {} for person {} ({} points, {})",
            calculation_id,
            run.person_id,
            run.days_calculated,
            run.date_range_str()
        );
        Ok(run)
    }

    async fn get_calculation(
        &self,
        calculation_id: CalculationId,
    ) -> RepositoryResult<CalculationRun> {
        let data = self.data.read();
        data.check_health()?;
        data.calculations
            .get(&calculation_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Calculation {} not found", calculation_id))
            })
    }

    async fn list_calculations(
        &self,
        person_id: Option<PersonId>,
    ) -> RepositoryResult<Vec<CalculationRun>> {
        let data = self.data.read();
        data.check_health()?;

        let mut runs: Vec<CalculationRun> = match person_id {
            Some(person_id) => data
                .person_calculations
                .get(&person_id)
                .into_iter()
                .flatten()
                .filter_map(|id| data.calculations.get(id))
                .cloned()
                .collect(),
            None => data.calculations.values().cloned().collect(),
        };
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(runs)
    }

    async fn delete_calculation(&self, calculation_id: CalculationId) -> RepositoryResult<usize> {
        let mut data = self.data.write();
        data.check_health()?;
        let removed = data.remove_calculation(calculation_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Calculation {} not found", calculation_id))
        })?;
        debug!(
            "Deleted calculation {} and {} data points",
            calculation_id, removed
        );
        Ok(removed)
    }

    async fn list_data_points(&self, filter: &DataPointFilter) -> RepositoryResult<Vec<DataPoint>> {
        let data = self.data.read();
        data.check_health()?;

        let mut points: Vec<DataPoint> = data
            .candidate_points(filter)
            .iter()
            .filter_map(|id| data.data_points.get(id))
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        points.sort_by(|a, b| a.date().cmp(&b.date()).then(a.id.cmp(&b.id)));
        Ok(points)
    }

    async fn get_data_point(&self, data_point_id: DataPointId) -> RepositoryResult<DataPoint> {
        let data = self.data.read();
        data.check_health()?;
        data.data_points
            .get(&data_point_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Data point {} not found", data_point_id))
            })
    }

    async fn count_data_points(&self) -> RepositoryResult<usize> {
        let data = self.data.read();
        data.check_health()?;
        Ok(data.data_points.len())
    }
}

#[async_trait]
impl AnalysisRepository for LocalRepository {
    async fn store_analysis(&self, record: &AnalysisRecord) -> RepositoryResult<AnalysisRecord> {
        let mut data = self.data.write();
        data.check_health()?;

        data.person(record.person_id)
            .map_err(|e| e.with_operation("store_analysis"))?;
        if let Some(id) = record.id {
            return Err(RepositoryError::validation(format!(
                "Analysis {} is already stored; re-runs create new records",
                id
            )));
        }
        if record.start_date > record.end_date {
            return Err(RepositoryError::validation(format!(
                "Analysis range {} is inverted",
                record.date_range_str()
            )));
        }

        let id = AnalysisId::new(data.next_analysis_id);
        data.next_analysis_id += 1;

        let mut stored = record.clone();
        stored.id = Some(id);
        data.analyses.insert(id, stored.clone());
        data.person_analyses
            .entry(record.person_id)
            .or_default()
            .insert(id);

        debug!(
            "Stored {} analysis {} for person {}",
            stored.analysis_type, id, stored.person_id
        );
        Ok(stored)
    }

    async fn get_analysis(&self, analysis_id: AnalysisId) -> RepositoryResult<AnalysisRecord> {
        let data = self.data.read();
        data.check_health()?;
        data.analyses
            .get(&analysis_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Analysis {} not found", analysis_id)))
    }

    async fn list_analyses(&self, filter: &AnalysisFilter) -> RepositoryResult<Vec<AnalysisRecord>> {
        let data = self.data.read();
        data.check_health()?;

        let mut records: Vec<AnalysisRecord> = data
            .analyses
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.analysis_date
                .cmp(&a.analysis_date)
                .then(b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn delete_analysis(&self, analysis_id: AnalysisId) -> RepositoryResult<()> {
        let mut data = self.data.write();
        data.check_health()?;
        let record = data.analyses.remove(&analysis_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Analysis {} not found", analysis_id))
        })?;
        if let Some(ids) = data.person_analyses.get_mut(&record.person_id) {
            ids.remove(&analysis_id);
        }
        Ok(())
    }
}
