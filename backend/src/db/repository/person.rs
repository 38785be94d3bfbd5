//! Person repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::models::{NewPerson, Person, PersonId, PersonUpdate};

/// Repository trait for people and the health of the backing store.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Check if the store is reachable and healthy.
    ///
    /// # Returns
    /// * `Ok(true)` - Store is healthy
    /// * `Err(RepositoryError)` - Store is unavailable
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Create a person.
    ///
    /// # Arguments
    /// * `person` - Fields of the new person
    /// * `created_at` - Timestamp for both `created_at` and `updated_at`
    ///
    /// # Returns
    /// * `Ok(Person)` - The stored person with its assigned id
    /// * `Err(RepositoryError::ValidationError)` - Empty name
    async fn create_person(
        &self,
        person: &NewPerson,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Person>;

    /// Fetch a person by id.
    ///
    /// # Returns
    /// * `Ok(Person)` - The person
    /// * `Err(RepositoryError::NotFound)` - No person with this id
    async fn get_person(&self, person_id: PersonId) -> RepositoryResult<Person>;

    /// List people ordered by name, then id.
    ///
    /// # Arguments
    /// * `search` - Optional case-insensitive needle matched against name, email and notes
    async fn list_people(&self, search: Option<&str>) -> RepositoryResult<Vec<Person>>;

    /// Apply a partial update.
    ///
    /// Changing the birthdate is rejected once any data point references the
    /// person, since every stored `days_alive` is derived from it.
    ///
    /// # Returns
    /// * `Ok(Person)` - The updated person
    /// * `Err(RepositoryError::NotFound)` - Unknown person
    /// * `Err(RepositoryError::ValidationError)` - Birthdate is locked or name is empty
    async fn update_person(
        &self,
        person_id: PersonId,
        update: &PersonUpdate,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<Person>;

    /// Delete a person together with their runs, data points and analyses.
    async fn delete_person(&self, person_id: PersonId) -> RepositoryResult<()>;

    async fn count_people(&self) -> RepositoryResult<usize>;
}
