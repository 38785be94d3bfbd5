use chrono::{DateTime, Utc};
use log::{info, warn};

use super::load_person;
use crate::algorithms::timeseries::generate;
use crate::config::CalculationSettings;
use crate::db::repository::FullRepository;
use crate::db::services;
use crate::error::{BiorhythmError, BiorhythmResult};
use crate::models::{NewCalculation, PersonId};
use crate::routes::calculations::{CalculationOutcome, CalculationRequest};
use crate::routes::timeseries::{PersonTimeseries, TimeseriesQuery};

/// Generate a series for a person and store it as one calculation run.
///
/// This function orchestrates the complete calculation:
/// 1. Resolve the request (defaults, day bounds, date range)
/// 2. Load the person
/// 3. Reject ranges that start before the birthdate
/// 4. Generate the series
/// 5. Store run and points atomically
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `request` - What to calculate
/// * `settings` - Default and maximum day counts
/// * `now` - Creation timestamp; its date is "today" for a request without `target_date`
///
/// # Returns
/// * `Ok(CalculationOutcome)` - The stored run and the number of points created
/// * `Err(BiorhythmError)` - Invalid request, unknown person, or store failure; nothing is stored
pub async fn calculate<R: FullRepository + ?Sized>(
    repo: &R,
    request: &CalculationRequest,
    settings: &CalculationSettings,
    now: DateTime<Utc>,
) -> BiorhythmResult<CalculationOutcome> {
    let resolved = request.resolve(now.date_naive(), settings).inspect_err(|e| {
        warn!(
            "Rejected calculation for person {}: {}",
            request.person_id, e
        );
    })?;

    let person = load_person(repo, resolved.person_id).await?;
    if resolved.start_date < person.birthdate {
        warn!(
            "Rejected calculation for person {}: range starts {} before birthdate {}",
            person.id, resolved.start_date, person.birthdate
        );
        return Err(BiorhythmError::DateBeforeBirth {
            person_id: person.id,
            date: resolved.start_date,
            birthdate: person.birthdate,
        });
    }

    let series = generate(person.birthdate, resolved.start_date, resolved.end_date)?;
    let calculation = NewCalculation::new(person.id, resolved.target_date, series, now)
        .with_notes(resolved.notes);

    let run = services::store_calculation(repo, &calculation)
        .await
        .map_err(|e| BiorhythmError::from_person_lookup(person.id, e))?;

    info!(
        "Calculated {} days for person {} ({})",
        run.days_calculated,
        person.id,
        run.date_range_str()
    );
    Ok(CalculationOutcome::new(run))
}

/// A person's stored points, filtered and optionally limited.
///
/// The reported date range covers every matching point, even when `limit`
/// cuts the returned list short.
pub async fn person_timeseries<R: FullRepository + ?Sized>(
    repo: &R,
    person_id: PersonId,
    query: &TimeseriesQuery,
) -> BiorhythmResult<PersonTimeseries> {
    let person = load_person(repo, person_id).await?;
    let points = services::list_data_points(repo, &query.to_filter(&person)).await?;
    Ok(PersonTimeseries::from_points(&person, &points, query.limit))
}
