//! Freezing statistics into analysis records.

use chrono::{DateTime, NaiveDate, Utc};

use super::statistics::Statistics;
use crate::models::{AnalysisParameters, AnalysisRecord, Person};

/// Analysis type tag for a plain statistics snapshot.
pub const STATISTICS_ANALYSIS: &str = "statistics";
/// Analysis type tag for a critical-day focused snapshot.
pub const CRITICAL_DAYS_ANALYSIS: &str = "critical_days";

/// One-line description of a statistics result.
pub fn summarize(statistics: &Statistics) -> String {
    if statistics.is_empty() {
        return "No biorhythm data in range".to_string();
    }
    format!(
        "{} days analysed, {} critical ({:.2}%)",
        statistics.count, statistics.critical_days, statistics.critical_percentage
    )
}

/// Capture an already computed [`Statistics`] as an [`AnalysisRecord`].
///
/// Pure constructor: no recomputation, and `analysis_date` comes from the
/// caller rather than a clock. The returned record has no id yet.
pub fn freeze(
    person: &Person,
    analysis_type: impl Into<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    parameters: AnalysisParameters,
    statistics: Statistics,
    analysis_date: DateTime<Utc>,
) -> AnalysisRecord {
    AnalysisRecord {
        id: None,
        person_id: person.id,
        analysis_type: analysis_type.into(),
        start_date,
        end_date,
        analysis_date,
        summary: summarize(&statistics),
        data_points_analyzed: statistics.count,
        analysis_parameters: parameters,
        results: statistics,
        input_checksum: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::statistics::aggregate_records;
    use crate::algorithms::timeseries::generate;
    use crate::models::PersonId;
    use chrono::TimeZone;

    fn person() -> Person {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Person {
            id: PersonId::new(3),
            name: "Grace".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            email: None,
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_freeze_captures_statistics_verbatim() {
        let person = person();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let series = generate(person.birthdate, start, end).unwrap();
        let stats = aggregate_records(&series.data);
        let at = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();

        let mut params = AnalysisParameters::new();
        params.insert("scope".to_string(), serde_json::json!("quarter"));

        let record = freeze(&person, STATISTICS_ANALYSIS, start, end, params.clone(), stats.clone(), at);

        assert_eq!(record.id, None);
        assert_eq!(record.person_id, person.id);
        assert_eq!(record.analysis_type, "statistics");
        assert_eq!(record.analysis_date, at);
        assert_eq!(record.results, stats);
        assert_eq!(record.data_points_analyzed, 91);
        assert_eq!(record.analysis_parameters, params);
        assert_eq!(record.date_range_str(), "2024-01-01 to 2024-03-31");
        assert!(record.summary.starts_with("91 days analysed"));
    }

    #[test]
    fn test_freeze_is_pure() {
        let person = person();
        let day = NaiveDate::from_ymd_opt(2024, 5, 5).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
        let a = freeze(&person, CRITICAL_DAYS_ANALYSIS, day, day, AnalysisParameters::new(), Statistics::empty(), at);
        let b = freeze(&person, CRITICAL_DAYS_ANALYSIS, day, day, AnalysisParameters::new(), Statistics::empty(), at);
        assert_eq!(a, b);
        assert_eq!(a.summary, "No biorhythm data in range");
        assert_eq!(a.data_points_analyzed, 0);
    }
}
