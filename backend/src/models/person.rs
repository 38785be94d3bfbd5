//! People whose biorhythms are tracked.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::PersonId;

/// A tracked person.
///
/// `birthdate` anchors every stored `days_alive` value; the store refuses to
/// change it once data points reference the person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub birthdate: NaiveDate,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Whole days between the birthdate and `date` (negative before birth).
    pub fn days_alive_on(&self, date: NaiveDate) -> i64 {
        (date - self.birthdate).num_days()
    }

    /// Age in days relative to a caller-supplied "today".
    pub fn age_in_days(&self, today: NaiveDate) -> i64 {
        self.days_alive_on(today)
    }

    /// Case-insensitive match against name, email and notes.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let hit = |field: &str| field.to_lowercase().contains(&needle);
        hit(self.name.as_str())
            || self.email.as_deref().is_some_and(hit)
            || self.notes.as_deref().is_some_and(hit)
    }
}

/// Input for creating a person. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPerson {
    pub fn new(name: impl Into<String>, birthdate: NaiveDate) -> Self {
        Self {
            name: name.into(),
            birthdate,
            email: None,
            notes: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update of a person; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl PersonUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.birthdate.is_none() && self.email.is_none() && self.notes.is_none()
    }

    /// Apply the update in place, stamping `updated_at`.
    pub fn apply_to(&self, person: &mut Person, updated_at: DateTime<Utc>) {
        if let Some(name) = &self.name {
            person.name = name.clone();
        }
        if let Some(birthdate) = self.birthdate {
            person.birthdate = birthdate;
        }
        if let Some(email) = &self.email {
            person.email = Some(email.clone());
        }
        if let Some(notes) = &self.notes {
            person.notes = Some(notes.clone());
        }
        person.updated_at = updated_at;
    }
}
