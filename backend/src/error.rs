//! Service-level error type.
//!
//! Engine errors ([`GenerationError`]) and store errors ([`RepositoryError`])
//! convert into [`BiorhythmError`] with `?`.

use chrono::NaiveDate;

use crate::algorithms::timeseries::GenerationError;
use crate::db::repository::RepositoryError;
use crate::models::PersonId;

/// Result type for service operations.
pub type BiorhythmResult<T> = Result<T, BiorhythmError>;

#[derive(Debug, thiserror::Error)]
#[allow(clippy::result_large_err)]
pub enum BiorhythmError {
    /// Range validation failed before any computation.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Unknown person: {0}")]
    UnknownPerson(PersonId),

    /// Stored points must have `days_alive >= 0`.
    #[error("Date {date} is before the birthdate {birthdate} of person {person_id}")]
    DateBeforeBirth {
        person_id: PersonId,
        date: NaiveDate,
        birthdate: NaiveDate,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BiorhythmError {
    /// Map a store "not found" on a person lookup to [`BiorhythmError::UnknownPerson`].
    pub fn from_person_lookup(person_id: PersonId, err: RepositoryError) -> Self {
        if err.is_not_found() {
            BiorhythmError::UnknownPerson(person_id)
        } else {
            BiorhythmError::Repository(err)
        }
    }

    /// `true` for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        match self {
            BiorhythmError::Generation(_)
            | BiorhythmError::UnknownPerson(_)
            | BiorhythmError::DateBeforeBirth { .. }
            | BiorhythmError::InvalidRequest(_) => true,
            BiorhythmError::Repository(err) => err.is_not_found() || err.is_validation(),
            BiorhythmError::Serialization(_) => false,
        }
    }
}
