use chrono::NaiveDate;

use super::load_person;
use crate::db::repository::{DataPointFilter, FullRepository};
use crate::db::services;
use crate::error::BiorhythmResult;
use crate::models::PersonId;
use crate::routes::people::PersonOverview;

/// A person together with age and activity figures.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `person_id` - Person to describe
/// * `today` - Reference date for `age_in_days`
pub async fn person_overview<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: PersonId,
    today: NaiveDate,
) -> BiorhythmResult<PersonOverview> {
    let person = load_person(repo, person_id).await?;
    let runs = services::list_calculations(repo, Some(person_id)).await?;
    let points = services::list_data_points(repo, &DataPointFilter::for_person(person_id)).await?;

    Ok(PersonOverview {
        age_in_days: person.age_in_days(today),
        calculation_count: runs.len(),
        data_point_count: points.len(),
        latest_calculation: runs.first().map(|run| run.created_at),
        person,
    })
}
