//! Pure biorhythm engine.
//!
//! - [`cycles`]: the cycle function and critical-day test
//! - [`timeseries`]: per-day series generation over a date range
//! - [`statistics`]: reductions over stored points, per person or global
//! - [`analysis`]: freezing statistics into analysis records
//!
//! Nothing in this module performs I/O, reads the clock or holds state, so
//! every function is safe to call concurrently.

pub mod analysis;
pub mod cycles;
pub mod statistics;
pub mod timeseries;


pub use analysis::freeze;
pub use cycles::{cycle_value, is_critical, Cycle, CRITICAL_TOLERANCE};
pub use statistics::{aggregate, aggregate_global, aggregate_records, GlobalStatistics, Statistics};
pub use timeseries::{generate, generate_days, DayRecord, GenerationError, TimeSeries};

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
