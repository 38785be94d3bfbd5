//! Checksums for reproducibility checks on analysis inputs.

use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::{AnalysisParameters, DataPoint, DataPointId, PersonId};

/// Calculate SHA-256 checksum of string content.
///
/// # Arguments
/// * `content` - Content to hash, typically canonical JSON
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[derive(Serialize)]
struct AnalysisInputs<'a> {
    person_id: PersonId,
    birthdate: NaiveDate,
    analysis_type: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    parameters: &'a AnalysisParameters,
    points: Vec<PointKey>,
}

#[derive(Serialize)]
struct PointKey {
    id: DataPointId,
    date: NaiveDate,
    days_alive: i64,
}

/// Fingerprint the inputs an analysis result is derived from.
///
/// Points are keyed by id, date and `days_alive` and sorted by id, so the
/// result does not depend on the order they were fetched in. Recomputing the
/// fingerprint later tells whether the stored result can still be reproduced.
pub fn analysis_input_checksum(
    person_id: PersonId,
    birthdate: NaiveDate,
    analysis_type: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    parameters: &AnalysisParameters,
    points: &[DataPoint],
) -> Result<String, serde_json::Error> {
    let mut keys: Vec<PointKey> = points
        .iter()
        .map(|p| PointKey {
            id: p.id,
            date: p.date(),
            days_alive: p.record.days_alive,
        })
        .collect();
    keys.sort_by_key(|k| k.id);

    let inputs = AnalysisInputs {
        person_id,
        birthdate,
        analysis_type,
        start_date,
        end_date,
        parameters,
        points: keys,
    };
    Ok(calculate_checksum(&serde_json::to_string(&inputs)?))
}
