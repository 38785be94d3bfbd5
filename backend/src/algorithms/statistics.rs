//! Statistics over stored biorhythm points.
//!
//! [`aggregate`] is a pure reduction over an already-filtered collection; the
//! caller decides the scope (one person, a date range, everything). Empty input
//! is not an error: it yields [`Statistics::empty`], with absent averages.
//!
//! Floating point sums are taken over values sorted with [`f64::total_cmp`], so
//! the result depends only on the multiset of inputs and not on their order.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::cycles::Cycle;
use super::round_to;
use super::timeseries::DayRecord;
use crate::models::{CalculationRun, DataPoint, Person};

/// Default trailing window for "recent activity" counts.
pub const RECENT_ACTIVITY_DAYS: i64 = 7;

/// Average, minimum and maximum of one cycle. All `None` for empty input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CycleSummary {
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Days flagged critical per cycle.
///
/// One day can be critical on several cycles, so these may add up to more than
/// [`Statistics::critical_days`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CriticalBreakdown {
    pub physical: usize,
    pub emotional: usize,
    pub intellectual: usize,
}

impl CriticalBreakdown {
    pub fn get(&self, cycle: Cycle) -> usize {
        match cycle {
            Cycle::Physical => self.physical,
            Cycle::Emotional => self.emotional,
            Cycle::Intellectual => self.intellectual,
        }
    }
}

/// Summary of a collection of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
    /// Inclusive span between earliest and latest date; 0 when empty.
    pub days_covered: i64,
    pub physical: CycleSummary,
    pub emotional: CycleSummary,
    pub intellectual: CycleSummary,
    /// Days with at least one critical cycle (a union, never above `count`).
    pub critical_days: usize,
    pub critical_breakdown: CriticalBreakdown,
    /// `critical_days / count * 100`, two decimals; 0 when empty.
    pub critical_percentage: f64,
}

impl Statistics {
    /// The "no data" result.
    pub fn empty() -> Self {
        Self {
            count: 0,
            earliest_date: None,
            latest_date: None,
            days_covered: 0,
            physical: CycleSummary::default(),
            emotional: CycleSummary::default(),
            intellectual: CycleSummary::default(),
            critical_days: 0,
            critical_breakdown: CriticalBreakdown::default(),
            critical_percentage: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn cycle(&self, cycle: Cycle) -> &CycleSummary {
        match cycle {
            Cycle::Physical => &self.physical,
            Cycle::Emotional => &self.emotional,
            Cycle::Intellectual => &self.intellectual,
        }
    }
}

#[derive(Default)]
struct CycleAccumulator {
    values: Vec<f64>,
    critical: usize,
}

impl CycleAccumulator {
    fn push(&mut self, value: f64, critical: bool) {
        self.values.push(value);
        if critical {
            self.critical += 1;
        }
    }

    fn finish(mut self) -> (CycleSummary, usize) {
        self.values.sort_by(f64::total_cmp);
        let average = if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
        };
        let summary = CycleSummary {
            average,
            min: self.values.first().copied(),
            max: self.values.last().copied(),
        };
        (summary, self.critical)
    }
}

/// Percentage of `part` in `total`, two decimals; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(part as f64 / total as f64 * 100.0, 2)
    }
}

/// Aggregate stored data points.
pub fn aggregate(points: &[DataPoint]) -> Statistics {
    aggregate_records(points.iter().map(|p| &p.record))
}

/// Aggregate any collection of day records.
///
/// # Arguments
/// * `records` - Days to summarise, in any order
///
/// # Returns
/// [`Statistics`]; [`Statistics::empty`] when `records` is empty.
pub fn aggregate_records<'a, I>(records: I) -> Statistics
where
    I: IntoIterator<Item = &'a DayRecord>,
{
    let mut accumulators: [CycleAccumulator; 3] = Default::default();
    let mut count = 0usize;
    let mut critical_days = 0usize;
    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;

    for record in records {
        count += 1;
        earliest = Some(earliest.map_or(record.date, |d| d.min(record.date)));
        latest = Some(latest.map_or(record.date, |d| d.max(record.date)));

        for (cycle, acc) in Cycle::ALL.into_iter().zip(accumulators.iter_mut()) {
            let reading = record.reading(cycle);
            acc.push(reading.value, reading.critical);
        }
        if record.is_any_critical() {
            critical_days += 1;
        }
    }

    if count == 0 {
        return Statistics::empty();
    }

    let [physical, emotional, intellectual] = accumulators;
    let (physical, physical_critical) = physical.finish();
    let (emotional, emotional_critical) = emotional.finish();
    let (intellectual, intellectual_critical) = intellectual.finish();

    let days_covered = match (earliest, latest) {
        (Some(first), Some(last)) => (last - first).num_days() + 1,
        _ => 0,
    };

    Statistics {
        count,
        earliest_date: earliest,
        latest_date: latest,
        days_covered,
        physical,
        emotional,
        intellectual,
        critical_days,
        critical_breakdown: CriticalBreakdown {
            physical: physical_critical,
            emotional: emotional_critical,
            intellectual: intellectual_critical,
        },
        critical_percentage: percentage(critical_days, count),
    }
}

/// Population-wide statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatistics {
    pub total_people: usize,
    pub total_calculations: usize,
    /// Aggregate over every stored point; `points.count` is the total point count.
    pub points: Statistics,
    /// Points per person, two decimals; 0 with no people.
    pub average_data_points_per_person: f64,
    pub recent_calculations: usize,
    pub recent_people: usize,
    pub window_days: i64,
    /// The `now` the recent-activity window was measured from.
    pub as_of: DateTime<Utc>,
}

/// Aggregate across all people.
///
/// Recent activity counts runs and people whose `created_at` is at or after
/// `now - window_days`. `now` is always supplied by the caller.
pub fn aggregate_global(
    people: &[Person],
    calculations: &[CalculationRun],
    points: &[DataPoint],
    now: DateTime<Utc>,
    window_days: i64,
) -> GlobalStatistics {
    let cutoff = Duration::try_days(window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let stats = aggregate(points);

    let average_data_points_per_person = if people.is_empty() {
        0.0
    } else {
        round_to(stats.count as f64 / people.len() as f64, 2)
    };

    GlobalStatistics {
        total_people: people.len(),
        total_calculations: calculations.len(),
        average_data_points_per_person,
        recent_calculations: calculations
            .iter()
            .filter(|c| c.created_at >= cutoff)
            .count(),
        recent_people: people.iter().filter(|p| p.created_at >= cutoff).count(),
        window_days,
        as_of: now,
        points: stats,
    }
}
