use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::people::PersonSummary;
use crate::algorithms::round_to;
use crate::algorithms::statistics::{CriticalBreakdown, CycleSummary, GlobalStatistics, Statistics};

// =========================================================
// Statistics types + routes
// =========================================================

/// Decimal places for reported cycle values.
pub const CYCLE_DECIMALS: i32 = 3;

fn round_cycle(value: Option<f64>) -> Option<f64> {
    value.map(|v| round_to(v, CYCLE_DECIMALS))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub days_covered: i64,
}

/// Per-cycle averages, three decimals; `null` when there is no data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleAverages {
    pub physical: Option<f64>,
    pub emotional: Option<f64>,
    pub intellectual: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalDaysReport {
    /// Days with at least one critical cycle.
    pub total: usize,
    pub breakdown: CriticalBreakdown,
    pub percentage: f64,
}

/// Serialized shape of a [`Statistics`] value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub count: usize,
    pub date_range: ReportDateRange,
    pub cycle_averages: CycleAverages,
    pub critical_days: CriticalDaysReport,
}

impl From<&Statistics> for StatisticsReport {
    fn from(stats: &Statistics) -> Self {
        Self {
            count: stats.count,
            date_range: ReportDateRange {
                start: stats.earliest_date,
                end: stats.latest_date,
                days_covered: stats.days_covered,
            },
            cycle_averages: CycleAverages {
                physical: round_cycle(stats.physical.average),
                emotional: round_cycle(stats.emotional.average),
                intellectual: round_cycle(stats.intellectual.average),
            },
            critical_days: CriticalDaysReport {
                total: stats.critical_days,
                breakdown: stats.critical_breakdown,
                percentage: stats.critical_percentage,
            },
        }
    }
}

/// Message attached to a person's statistics when they have no points.
pub const NO_DATA_MESSAGE: &str = "No biorhythm data available for this person";

/// Statistics for one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonStatistics {
    pub person: PersonSummary,
    pub statistics: StatisticsReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PersonStatistics {
    pub fn new(person: PersonSummary, stats: &Statistics) -> Self {
        Self {
            person,
            statistics: StatisticsReport::from(stats),
            message: stats.is_empty().then(|| NO_DATA_MESSAGE.to_string()),
        }
    }
}

/// Average, minimum and maximum of one cycle, three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleStatistics {
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<&CycleSummary> for CycleStatistics {
    fn from(summary: &CycleSummary) -> Self {
        Self {
            average: round_cycle(summary.average),
            min: round_cycle(summary.min),
            max: round_cycle(summary.max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleStatisticsReport {
    pub physical: CycleStatistics,
    pub emotional: CycleStatistics,
    pub intellectual: CycleStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalDateRange {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
    pub span_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub window_days: i64,
    pub new_calculations: usize,
    pub new_people: usize,
    pub average_data_points_per_person: f64,
    pub critical_days_percentage: f64,
}

/// Serialized shape of [`GlobalStatistics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatisticsReport {
    pub total_people: usize,
    pub total_calculations: usize,
    pub total_data_points: usize,
    pub total_critical_days: usize,
    pub date_range: GlobalDateRange,
    pub cycle_statistics: CycleStatisticsReport,
    pub recent_activity: RecentActivity,
    pub as_of: DateTime<Utc>,
}

impl From<&GlobalStatistics> for GlobalStatisticsReport {
    fn from(global: &GlobalStatistics) -> Self {
        let points = &global.points;
        Self {
            total_people: global.total_people,
            total_calculations: global.total_calculations,
            total_data_points: points.count,
            total_critical_days: points.critical_days,
            date_range: GlobalDateRange {
                earliest: points.earliest_date,
                latest: points.latest_date,
                span_days: points.days_covered,
            },
            cycle_statistics: CycleStatisticsReport {
                physical: CycleStatistics::from(&points.physical),
                emotional: CycleStatistics::from(&points.emotional),
                intellectual: CycleStatistics::from(&points.intellectual),
            },
            recent_activity: RecentActivity {
                window_days: global.window_days,
                new_calculations: global.recent_calculations,
                new_people: global.recent_people,
                average_data_points_per_person: global.average_data_points_per_person,
                critical_days_percentage: points.critical_percentage,
            },
            as_of: global.as_of,
        }
    }
}

pub const GET_PERSON_STATISTICS: &str = "get_person_statistics";
pub const GET_RANGE_STATISTICS: &str = "get_range_statistics";
pub const GET_GLOBAL_STATISTICS: &str = "get_global_statistics";
