//! Public API surface.
//!
//! This file consolidates the entity, request and response types.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::algorithms::cycles::{Cycle, CycleReading};
pub use crate::algorithms::statistics::{
    CriticalBreakdown, CycleSummary, GlobalStatistics, Statistics,
};
pub use crate::algorithms::timeseries::{DayRecord, SeriesMeta, TimeSeries};
pub use crate::db::repository::{AnalysisFilter, DataPointFilter};
pub use crate::models::{
    AnalysisId, AnalysisParameters, AnalysisRecord, CalculationId, CalculationRun, DataPoint,
    DataPointId, NewCalculation, NewPerson, Person, PersonId, PersonUpdate,
};
pub use crate::routes::analyses::AnalysisRequest;
pub use crate::routes::calculations::{CalculationOutcome, CalculationRequest, ResolvedCalculation};
pub use crate::routes::people::{PersonOverview, PersonSummary};
pub use crate::routes::statistics::{
    CriticalDaysReport, CycleAverages, CycleStatistics, CycleStatisticsReport, GlobalDateRange,
    GlobalStatisticsReport, PersonStatistics, RecentActivity, ReportDateRange, StatisticsReport,
};
pub use crate::routes::timeseries::{DateRange, PersonTimeseries, TimeseriesQuery};
