use chrono::{DateTime, Utc};
use log::{info, warn};

use super::load_person;
use crate::algorithms::analysis::freeze;
use crate::algorithms::statistics::aggregate;
use crate::db::checksum::analysis_input_checksum;
use crate::db::repository::FullRepository;
use crate::db::services;
use crate::error::BiorhythmResult;
use crate::models::{AnalysisId, AnalysisRecord};
use crate::routes::analyses::AnalysisRequest;

/// Aggregate a person's points over a range and store the frozen result.
///
/// The stored record carries a fingerprint of its inputs, so
/// [`verify_analysis`] can later tell whether the same result would be
/// produced from the current data.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `request` - Person, range, type and parameters
/// * `now` - Recorded as `analysis_date`
pub async fn run_analysis<R: FullRepository + ?Sized>(
    repo: &R,
    request: &AnalysisRequest,
    now: DateTime<Utc>,
) -> BiorhythmResult<AnalysisRecord> {
    request.validate()?;
    let person = load_person(repo, request.person_id).await?;

    let points = services::list_data_points(repo, &request.to_filter()).await?;
    let stats = aggregate(&points);
    let checksum = analysis_input_checksum(
        person.id,
        person.birthdate,
        &request.analysis_type,
        request.start_date,
        request.end_date,
        &request.parameters,
        &points,
    )?;

    let record = freeze(
        &person,
        request.analysis_type.clone(),
        request.start_date,
        request.end_date,
        request.parameters.clone(),
        stats,
        now,
    )
    .with_input_checksum(checksum);

    let stored = services::store_analysis(repo, &record).await?;
    info!(
        "Analysis {:?} for person {}: {}",
        stored.id, person.id, stored.summary
    );
    Ok(stored)
}

/// Recompute a stored analysis from the current data and compare.
///
/// # Returns
/// * `Ok(true)` - Inputs and results still match the stored record
/// * `Ok(false)` - The data changed since the analysis was run
pub async fn verify_analysis<R: FullRepository + ?Sized>(
    repo: &R,
    analysis_id: AnalysisId,
) -> BiorhythmResult<bool> {
    let record = services::get_analysis(repo, analysis_id).await?;
    let person = load_person(repo, record.person_id).await?;

    let request = AnalysisRequest {
        person_id: record.person_id,
        analysis_type: record.analysis_type.clone(),
        start_date: record.start_date,
        end_date: record.end_date,
        parameters: record.analysis_parameters.clone(),
    };
    let points = services::list_data_points(repo, &request.to_filter()).await?;
    let checksum = analysis_input_checksum(
        person.id,
        person.birthdate,
        &record.analysis_type,
        record.start_date,
        record.end_date,
        &record.analysis_parameters,
        &points,
    )?;

    let matches = record.input_checksum.as_deref() == Some(checksum.as_str())
        && aggregate(&points) == record.results;
    if !matches {
        warn!("Analysis {} no longer matches the stored data", analysis_id);
    }
    Ok(matches)
}
