use chrono::{DateTime, NaiveDate, Utc};
use log::info;

use super::load_person;
use crate::algorithms::statistics::{aggregate, aggregate_global, Statistics};
use crate::db::repository::{DataPointFilter, FullRepository};
use crate::db::services;
use crate::error::BiorhythmResult;
use crate::models::PersonId;
use crate::routes::people::PersonSummary;
use crate::routes::statistics::{GlobalStatisticsReport, PersonStatistics};

/// Statistics over every stored point of one person.
///
/// A person without points gets count 0, absent averages and a "no data"
/// message; that is not an error.
pub async fn person_statistics<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: PersonId,
) -> BiorhythmResult<PersonStatistics> {
    let person = load_person(repo, person_id).await?;
    let points = services::list_data_points(repo, &DataPointFilter::for_person(person_id)).await?;
    let stats = aggregate(&points);
    Ok(PersonStatistics::new(PersonSummary::from(&person), &stats))
}

/// Statistics over one person's points within an inclusive date range.
pub async fn range_statistics<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: PersonId,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> BiorhythmResult<Statistics> {
    load_person(repo, person_id).await?;
    let filter = DataPointFilter::for_person(person_id).between(start_date, end_date);
    let points = services::list_data_points(repo, &filter).await?;
    Ok(aggregate(&points))
}

/// Population-wide statistics.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `now` - Reference instant for the recent-activity window
/// * `window_days` - Length of the recent-activity window
pub async fn global_statistics<R: FullRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
    window_days: i64,
) -> BiorhythmResult<GlobalStatisticsReport> {
    let people = services::list_people(repo, None).await?;
    let runs = services::list_calculations(repo, None).await?;
    let points = services::list_data_points(repo, &DataPointFilter::default()).await?;

    let global = aggregate_global(&people, &runs, &points, now, window_days);
    info!(
        "Global statistics: {} people, {} runs, {} points",
        global.total_people, global.total_calculations, global.points.count
    );
    Ok(GlobalStatisticsReport::from(&global))
}
