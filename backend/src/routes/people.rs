use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Person, PersonId};

// =========================================================
// People types + routes
// =========================================================

/// Identifying fields of a person, embedded in other responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: PersonId,
    pub name: String,
    pub birthdate: NaiveDate,
}

impl From<&Person> for PersonSummary {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id,
            name: person.name.clone(),
            birthdate: person.birthdate,
        }
    }
}

/// A person with derived activity figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonOverview {
    #[serde(flatten)]
    pub person: Person,
    pub age_in_days: i64,
    pub calculation_count: usize,
    pub data_point_count: usize,
    /// `created_at` of the newest calculation run, if any.
    pub latest_calculation: Option<DateTime<Utc>>,
}

pub const LIST_PEOPLE: &str = "list_people";
pub const CREATE_PERSON: &str = "create_person";
pub const GET_PERSON: &str = "get_person";
pub const GET_PERSON_OVERVIEW: &str = "get_person_overview";
pub const UPDATE_PERSON: &str = "update_person";
pub const DELETE_PERSON: &str = "delete_person";
