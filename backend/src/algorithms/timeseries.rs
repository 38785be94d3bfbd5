//! Deterministic per-day biorhythm series generation.
//!
//! [`generate`] validates the requested range up front and then evaluates the
//! three cycles for every calendar day in it. Nothing here touches storage or
//! the clock; callers decide what "today" is and where the output goes.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::cycles::{Cycle, CycleReading};

/// Largest allowed `end_date - start_date`, in days.
pub const MAX_RANGE_DAYS: i64 = 3650;

/// Version tag stamped on every generated series and stored with each run.
pub const GENERATOR_VERSION: &str = concat!("biorhythm-engine/", env!("CARGO_PKG_VERSION"));

/// Errors raised before any day is computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid range: start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Range too large: {span_days} days between {start} and {end}, at most {max_days} allowed")]
    RangeTooLarge {
        start: NaiveDate,
        end: NaiveDate,
        span_days: i64,
        max_days: i64,
    },
}

/// One day of a biorhythm series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub days_alive: i64,
    pub physical: f64,
    pub emotional: f64,
    pub intellectual: f64,
    pub is_physical_critical: bool,
    pub is_emotional_critical: bool,
    pub is_intellectual_critical: bool,
}

impl DayRecord {
    /// Evaluate all cycles for `date` relative to `birthdate`.
    ///
    /// `days_alive` is derived from the two dates directly, never from a
    /// running counter.
    pub fn compute(birthdate: NaiveDate, date: NaiveDate) -> Self {
        let days_alive = (date - birthdate).num_days();
        let physical = Cycle::Physical.reading(days_alive);
        let emotional = Cycle::Emotional.reading(days_alive);
        let intellectual = Cycle::Intellectual.reading(days_alive);

        Self {
            date,
            days_alive,
            physical: physical.value,
            emotional: emotional.value,
            intellectual: intellectual.value,
            is_physical_critical: physical.critical,
            is_emotional_critical: emotional.critical,
            is_intellectual_critical: intellectual.critical,
        }
    }

    pub fn reading(&self, cycle: Cycle) -> CycleReading {
        match cycle {
            Cycle::Physical => CycleReading {
                value: self.physical,
                critical: self.is_physical_critical,
            },
            Cycle::Emotional => CycleReading {
                value: self.emotional,
                critical: self.is_emotional_critical,
            },
            Cycle::Intellectual => CycleReading {
                value: self.intellectual,
                critical: self.is_intellectual_critical,
            },
        }
    }

    pub fn value(&self, cycle: Cycle) -> f64 {
        self.reading(cycle).value
    }

    pub fn is_critical(&self, cycle: Cycle) -> bool {
        self.reading(cycle).critical
    }

    /// Cycles flagged critical on this day, in canonical order.
    pub fn critical_cycles(&self) -> Vec<Cycle> {
        Cycle::ALL
            .into_iter()
            .filter(|c| self.is_critical(*c))
            .collect()
    }

    pub fn is_any_critical(&self) -> bool {
        self.is_physical_critical || self.is_emotional_critical || self.is_intellectual_critical
    }
}

/// Metadata describing a generated series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub birthdate: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of records, `(end_date - start_date) + 1`.
    pub days: usize,
    pub generator_version: String,
}

/// A generated series: metadata plus one record per day, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub meta: SeriesMeta,
    pub data: Vec<DayRecord>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Check a range against the generator bounds and return its span in days.
pub fn validate_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<i64, GenerationError> {
    if start_date > end_date {
        return Err(GenerationError::InvalidRange {
            start: start_date,
            end: end_date,
        });
    }

    let span_days = (end_date - start_date).num_days();
    if span_days > MAX_RANGE_DAYS {
        return Err(GenerationError::RangeTooLarge {
            start: start_date,
            end: end_date,
            span_days,
            max_days: MAX_RANGE_DAYS,
        });
    }

    Ok(span_days)
}

/// Generate the series for every day in `[start_date, end_date]`.
///
/// # Arguments
/// * `birthdate` - Anchor for `days_alive`; dates before it are computed like any other
/// * `start_date` - First day, inclusive
/// * `end_date` - Last day, inclusive
///
/// # Returns
/// * `Ok(TimeSeries)` - Exactly `(end_date - start_date) + 1` records
/// * `Err(GenerationError::InvalidRange)` - `start_date > end_date`
/// * `Err(GenerationError::RangeTooLarge)` - span above [`MAX_RANGE_DAYS`]
///
/// # Examples
/// ```
/// use biorhythm_engine::algorithms::timeseries::generate;
/// use chrono::NaiveDate;
///
/// let birth = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
/// let day = NaiveDate::from_ymd_opt(2000, 1, 24).unwrap();
/// let series = generate(birth, day, day).unwrap();
/// assert_eq!(series.data[0].days_alive, 23);
/// assert!(series.data[0].is_physical_critical);
/// ```
pub fn generate(
    birthdate: NaiveDate,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<TimeSeries, GenerationError> {
    let span_days = validate_range(start_date, end_date)?;

    // Inclusive of `end_date`, even when it is `NaiveDate::MAX`.
    let data: Vec<DayRecord> = (0..=span_days as u64)
        .filter_map(|offset| start_date.checked_add_days(Days::new(offset)))
        .map(|date| DayRecord::compute(birthdate, date))
        .collect();

    Ok(TimeSeries {
        meta: SeriesMeta {
            birthdate,
            start_date,
            end_date,
            days: data.len(),
            generator_version: GENERATOR_VERSION.to_string(),
        },
        data,
    })
}

/// Resolve the range covering `days` days that ends on `target_date`.
///
/// `days == 0` is an empty request and reported as an inverted range.
pub fn range_ending_on(
    target_date: NaiveDate,
    days: u32,
) -> Result<(NaiveDate, NaiveDate), GenerationError> {
    if days == 0 {
        return Err(GenerationError::InvalidRange {
            start: target_date.succ_opt().unwrap_or(target_date),
            end: target_date,
        });
    }

    let back = u64::from(days - 1);
    target_date
        .checked_sub_days(Days::new(back))
        .map(|start_date| (start_date, target_date))
        .ok_or(GenerationError::RangeTooLarge {
            start: NaiveDate::MIN,
            end: target_date,
            span_days: i64::from(days - 1),
            max_days: MAX_RANGE_DAYS,
        })
}

/// Generate `days` consecutive days ending on `target_date`.
pub fn generate_days(
    birthdate: NaiveDate,
    target_date: NaiveDate,
    days: u32,
) -> Result<TimeSeries, GenerationError> {
    let (start_date, end_date) = range_ending_on(target_date, days)?;
    generate(birthdate, start_date, end_date)
}
