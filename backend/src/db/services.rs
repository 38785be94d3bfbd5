//! High-level database service layer.
//!
//! Repository-agnostic operations that work with any implementation of the
//! repository traits. These functions add the logging and integrity checks
//! that should be consistent regardless of the storage backend; orchestration
//! that involves the engine lives in [`crate::services`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (CLI binary, crate::services)        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (db/services.rs)                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - PersonRepository                                     │
//! │  - CalculationRepository                                │
//! │  - AnalysisRepository                                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!          ┌──────────▼──────────────┐
//!          │ Local Repository        │
//!          │ (in-memory)             │
//!          └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use biorhythm_engine::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let people = services::list_people(&repo, None).await?;
//!     println!("Found {} people", people.len());
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{info, warn};

use super::repository::{
    AnalysisFilter, DataPointFilter, FullRepository, RepositoryError, RepositoryResult,
};
use crate::models::{
    AnalysisId, AnalysisRecord, CalculationId, CalculationRun, DataPoint, NewCalculation,
    NewPerson, Person, PersonId, PersonUpdate,
};

// ==================== Health & Connection ====================

/// Check if the store is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== People ====================

/// Create a person.
///
/// Leading and trailing whitespace is trimmed from the name, and blank
/// optional fields are stored as absent.
pub async fn create_person<R: FullRepository + ?Sized>(
    repo: &R,
    person: &NewPerson,
    created_at: DateTime<Utc>,
) -> RepositoryResult<Person> {
    let normalized = NewPerson {
        name: person.name.trim().to_string(),
        birthdate: person.birthdate,
        email: non_blank(person.email.as_deref()),
        notes: non_blank(person.notes.as_deref()),
    };

    let stored = repo.create_person(&normalized, created_at).await?;
    info!(
        "Service layer: created person {} '{}' (born {})",
        stored.id, stored.name, stored.birthdate
    );
    Ok(stored)
}

pub async fn get_person<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: PersonId,
) -> RepositoryResult<Person> {
    repo.get_person(person_id).await
}

/// List people ordered by name, optionally filtered by a search needle.
pub async fn list_people<R: FullRepository + ?Sized>(
    repo: &R,
    search: Option<&str>,
) -> RepositoryResult<Vec<Person>> {
    repo.list_people(search).await
}

/// Apply a partial update to a person.
///
/// An empty update is a no-op that returns the current person unchanged.
pub async fn update_person<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: PersonId,
    update: &PersonUpdate,
    updated_at: DateTime<Utc>,
) -> RepositoryResult<Person> {
    if update.is_empty() {
        return repo.get_person(person_id).await;
    }

    match repo.update_person(person_id, update, updated_at).await {
        Ok(person) => {
            info!("Service layer: updated person {}", person_id);
            Ok(person)
        }
        Err(e) => {
            if e.is_validation() {
                warn!("Service layer: rejected update of person {}: {}", person_id, e);
            }
            Err(e)
        }
    }
}

/// Delete a person and everything that belongs to them.
pub async fn delete_person<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: PersonId,
) -> RepositoryResult<()> {
    repo.delete_person(person_id).await?;
    info!("Service layer: deleted person {} and dependent data", person_id);
    Ok(())
}

// ==================== Calculations ====================

/// Store a generated series as a calculation run.
pub async fn store_calculation<R: FullRepository + ?Sized>(
    repo: &R,
    calculation: &NewCalculation,
) -> RepositoryResult<CalculationRun> {
    info!(
        "Service layer: storing calculation for person {} ({} to {}, {} days)",
        calculation.person_id,
        calculation.series.meta.start_date,
        calculation.series.meta.end_date,
        calculation.series.len()
    );

    let run = repo.store_calculation(calculation).await?;

    // The store reports what it wrote; a mismatch means the backend broke atomicity.
    if run.days_calculated != calculation.series.len() {
        return Err(RepositoryError::internal(format!(
            "Calculation {} stored {} points, expected {}",
            run.id,
            run.days_calculated,
            calculation.series.len()
        )));
    }
    Ok(run)
}

pub async fn get_calculation<R: FullRepository + ?Sized>(
    repo: &R,
    calculation_id: CalculationId,
) -> RepositoryResult<CalculationRun> {
    repo.get_calculation(calculation_id).await
}

/// List runs newest first, optionally restricted to one person.
pub async fn list_calculations<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: Option<PersonId>,
) -> RepositoryResult<Vec<CalculationRun>> {
    repo.list_calculations(person_id).await
}

/// Delete a run; returns how many data points went with it.
pub async fn delete_calculation<R: FullRepository + ?Sized>(
    repo: &R,
    calculation_id: CalculationId,
) -> RepositoryResult<usize> {
    let removed = repo.delete_calculation(calculation_id).await?;
    info!(
        "Service layer: deleted calculation {} ({} data points)",
        calculation_id, removed
    );
    Ok(removed)
}

// ==================== Data points ====================

/// Query data points, ordered by date.
///
/// An inverted date filter matches nothing and is answered without a store call.
pub async fn list_data_points<R: FullRepository + ?Sized>(
    repo: &R,
    filter: &DataPointFilter,
) -> RepositoryResult<Vec<DataPoint>> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            warn!(
                "Service layer: data point filter has start {} after end {}",
                start, end
            );
            return Ok(Vec::new());
        }
    }
    repo.list_data_points(filter).await
}

// ==================== Analyses ====================

pub async fn store_analysis<R: FullRepository + ?Sized>(
    repo: &R,
    record: &AnalysisRecord,
) -> RepositoryResult<AnalysisRecord> {
    let stored = repo.store_analysis(record).await?;
    info!(
        "Service layer: stored {} analysis for person {} ({})",
        stored.analysis_type,
        stored.person_id,
        stored.date_range_str()
    );
    Ok(stored)
}

pub async fn get_analysis<R: FullRepository + ?Sized>(
    repo: &R,
    analysis_id: AnalysisId,
) -> RepositoryResult<AnalysisRecord> {
    repo.get_analysis(analysis_id).await
}

/// List analyses newest first.
pub async fn list_analyses<R: FullRepository + ?Sized>(
    repo: &R,
    filter: &AnalysisFilter,
) -> RepositoryResult<Vec<AnalysisRecord>> {
    repo.list_analyses(filter).await
}

pub async fn delete_analysis<R: FullRepository + ?Sized>(
    repo: &R,
    analysis_id: AnalysisId,
) -> RepositoryResult<()> {
    repo.delete_analysis(analysis_id).await?;
    info!("Service layer: deleted analysis {}", analysis_id);
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
