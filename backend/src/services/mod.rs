//! Service layer for business logic and orchestration.
//!
//! Services sit between callers and the storage layer: they load entities
//! through [`crate::db::services`], run the pure engine in
//! [`crate::algorithms`], and shape results into [`crate::routes`] types.
//! "Now" is always a parameter here; only the binary reads the clock.

pub mod analyses;
pub mod calculations;
pub mod people;
pub mod statistics;

pub use analyses::{run_analysis, verify_analysis};
pub use calculations::{calculate, person_timeseries};
pub use people::person_overview;
pub use statistics::{global_statistics, person_statistics, range_statistics};

use crate::db::repository::FullRepository;
use crate::error::{BiorhythmError, BiorhythmResult};
use crate::models::{Person, PersonId};

/// Load a person, reporting a missing one as [`BiorhythmError::UnknownPerson`].
pub(crate) async fn load_person<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: PersonId,
) -> BiorhythmResult<Person> {
    crate::db::services::get_person(repo, person_id)
        .await
        .map_err(|e| BiorhythmError::from_person_lookup(person_id, e))
}
