//! Domain entities owned by the persistence layer.
//!
//! A [`Person`] owns zero or more [`CalculationRun`]s (by id), each run owns its
//! [`DataPoint`]s, and [`AnalysisRecord`]s hang off the person. Entities are
//! referenced by id newtypes rather than pointers.

pub mod analysis;
pub mod calculation;
pub mod macros;
pub mod person;

use crate::define_id_type;

define_id_type!(i64, PersonId);
define_id_type!(i64, CalculationId);
define_id_type!(i64, DataPointId);
define_id_type!(i64, AnalysisId);

pub use analysis::{AnalysisParameters, AnalysisRecord};
pub use calculation::{CalculationRun, DataPoint, NewCalculation};
pub use person::{NewPerson, Person, PersonUpdate};
