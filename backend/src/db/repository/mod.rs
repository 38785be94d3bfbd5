//! Repository traits for biorhythm storage.
//!
//! The storage interface is split by concern:
//!
//! - [`PersonRepository`]: people and store health
//! - [`CalculationRepository`]: calculation runs and their data points
//! - [`AnalysisRepository`]: frozen analysis records
//!
//! For functions that need all repository capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let person = repo.get_person(person_id).await?;
//!     repo.store_calculation(&calculation).await?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod calculation;
pub mod error;
pub mod person;

pub use analysis::{AnalysisFilter, AnalysisRepository};
pub use calculation::{CalculationRepository, DataPointFilter};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use person::PersonRepository;

/// Combined trait for implementations that provide every repository capability.
///
/// Automatically implemented for any type implementing all three traits.
pub trait FullRepository: PersonRepository + CalculationRepository + AnalysisRepository {}

// Blanket implementation: any type implementing all three traits automatically implements FullRepository
impl<T> FullRepository for T where T: PersonRepository + CalculationRepository + AnalysisRepository {}
