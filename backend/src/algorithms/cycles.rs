//! Sinusoidal biorhythm cycles.
//!
//! Each cycle is `sin(2π · days_alive / period)`. A day is *critical* for a
//! cycle when the sampled value lies within [`CRITICAL_TOLERANCE`] of zero,
//! i.e. the cycle is crossing the axis.
//!
//! With daily sampling and a tolerance of `0.05`, only days that land exactly
//! on a zero crossing are flagged: `days_alive ≡ 0 (mod period)` for every
//! cycle, plus `≡ 14 (mod 28)` for the emotional cycle. Every other integer
//! day sits at least `sin(π/33) ≈ 0.095` away from zero.

use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical cycle length in days.
pub const PHYSICAL_PERIOD: u32 = 23;
/// Emotional cycle length in days.
pub const EMOTIONAL_PERIOD: u32 = 28;
/// Intellectual cycle length in days.
pub const INTELLECTUAL_PERIOD: u32 = 33;

/// Maximum absolute value for which a sampled cycle is flagged critical.
///
/// Persisted critical flags were produced with this exact constant; changing
/// it invalidates comparisons against stored data.
pub const CRITICAL_TOLERANCE: f64 = 0.05;

/// The three tracked cycles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    Physical,
    Emotional,
    Intellectual,
}

impl Cycle {
    /// All cycles in canonical order.
    pub const ALL: [Cycle; 3] = [Cycle::Physical, Cycle::Emotional, Cycle::Intellectual];

    pub fn period(self) -> u32 {
        match self {
            Cycle::Physical => PHYSICAL_PERIOD,
            Cycle::Emotional => EMOTIONAL_PERIOD,
            Cycle::Intellectual => INTELLECTUAL_PERIOD,
        }
    }

    /// Lowercase key used in serialized payloads.
    pub fn key(self) -> &'static str {
        match self {
            Cycle::Physical => "physical",
            Cycle::Emotional => "emotional",
            Cycle::Intellectual => "intellectual",
        }
    }

    /// Value and critical flag of this cycle for a given day.
    pub fn reading(self, days_alive: i64) -> CycleReading {
        let value = cycle_value(days_alive, self.period());
        CycleReading {
            value,
            critical: is_critical(value, CRITICAL_TOLERANCE),
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Cycle::Physical => "Physical",
            Cycle::Emotional => "Emotional",
            Cycle::Intellectual => "Intellectual",
        };
        f.write_str(label)
    }
}

/// A sampled cycle value together with its critical flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReading {
    pub value: f64,
    pub critical: bool,
}

/// Compute `sin(2π · days_alive / period)`.
///
/// The phase is reduced modulo `period` in integer arithmetic before the
/// floating point step, so the result is exact to the same degree for any
/// `days_alive`, including negative values and very large magnitudes.
///
/// # Arguments
/// * `days_alive` - Whole days since birth (may be negative)
/// * `period` - Cycle length in days; a zero period has no phase and yields `0.0`
///
/// # Returns
/// A value in `[-1.0, 1.0]`.
///
/// # Examples
/// ```
/// use biorhythm_engine::algorithms::cycles::{cycle_value, PHYSICAL_PERIOD};
///
/// assert_eq!(cycle_value(0, PHYSICAL_PERIOD), 0.0);
/// assert!(cycle_value(23, PHYSICAL_PERIOD).abs() < 1e-12);
/// ```
pub fn cycle_value(days_alive: i64, period: u32) -> f64 {
    if period == 0 {
        return 0.0;
    }
    let period = i64::from(period);
    let phase = days_alive.rem_euclid(period) as f64 / period as f64;
    (TAU * phase).sin().clamp(-1.0, 1.0)
}

/// `true` iff `|value| <= tolerance`. `NaN` is never critical.
pub fn is_critical(value: f64, tolerance: f64) -> bool {
    value.abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_are_fixed() {
        assert_eq!(Cycle::Physical.period(), 23);
        assert_eq!(Cycle::Emotional.period(), 28);
        assert_eq!(Cycle::Intellectual.period(), 33);
    }

    #[test]
    fn test_full_period_returns_to_zero() {
        for cycle in Cycle::ALL {
            let p = i64::from(cycle.period());
            assert_eq!(cycle_value(0, cycle.period()), 0.0);
            assert_eq!(cycle_value(p, cycle.period()), 0.0);
            assert_eq!(cycle_value(-p, cycle.period()), 0.0);
            assert!(cycle.reading(p).critical);
        }
    }

    #[test]
    fn test_quarter_period_peaks() {
        // 28 is divisible by 4, so the emotional cycle hits +1 and -1 exactly.
        assert!((cycle_value(7, EMOTIONAL_PERIOD) - 1.0).abs() < 1e-12);
        assert!((cycle_value(21, EMOTIONAL_PERIOD) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_physical_samples_around_zero_crossings() {
        // Crossings at 0, 5.75 (peak side), 11.5, 17.25 (trough side) mod 23.
        // Only 0 and 11.5 are true zero crossings; integer days 11 and 12
        // straddle 11.5 and sit ~0.136 from zero.
        let d11 = cycle_value(11, PHYSICAL_PERIOD);
        let d12 = cycle_value(12, PHYSICAL_PERIOD);
        assert!(d11 > 0.0 && d12 < 0.0);
        assert!((d11 - 0.136_166_649).abs() < 1e-6);
        assert!((d12 + 0.136_166_649).abs() < 1e-6);
        assert!(!is_critical(d11, CRITICAL_TOLERANCE));
        assert!(!is_critical(d12, CRITICAL_TOLERANCE));

        // 5.75 and 17.25 are the extremes, never critical.
        assert!(cycle_value(6, PHYSICAL_PERIOD) > 0.99);
        assert!(cycle_value(17, PHYSICAL_PERIOD) < -0.99);

        assert!(is_critical(cycle_value(0, PHYSICAL_PERIOD), CRITICAL_TOLERANCE));
        assert!(is_critical(cycle_value(46, PHYSICAL_PERIOD), CRITICAL_TOLERANCE));
        assert!(!is_critical(cycle_value(1, PHYSICAL_PERIOD), CRITICAL_TOLERANCE));
        assert!(!is_critical(cycle_value(22, PHYSICAL_PERIOD), CRITICAL_TOLERANCE));
    }

    #[test]
    fn test_emotional_half_period_is_critical() {
        let reading = Cycle::Emotional.reading(14);
        assert!(reading.value.abs() < 1e-12);
        assert!(reading.critical);
    }

    #[test]
    fn test_negative_days_follow_the_same_curve() {
        for d in 1..100_i64 {
            let forward = cycle_value(d, INTELLECTUAL_PERIOD);
            let backward = cycle_value(d - 33 * 10, INTELLECTUAL_PERIOD);
            assert_eq!(forward, backward);
        }
        assert!((cycle_value(-1, PHYSICAL_PERIOD) + cycle_value(1, PHYSICAL_PERIOD)).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_magnitudes_stay_bounded() {
        for d in [i64::MIN, i64::MIN + 1, -1, i64::MAX - 1, i64::MAX] {
            for cycle in Cycle::ALL {
                let v = cycle_value(d, cycle.period());
                assert!((-1.0..=1.0).contains(&v), "{cycle} at {d} gave {v}");
            }
        }
    }

    #[test]
    fn test_is_critical_boundaries() {
        assert!(is_critical(0.05, 0.05));
        assert!(is_critical(-0.05, 0.05));
        assert!(!is_critical(0.050_001, 0.05));
        assert!(!is_critical(f64::NAN, 0.05));
    }

    #[test]
    fn test_zero_period() {
        assert_eq!(cycle_value(10, 0), 0.0);
    }

    #[test]
    fn test_display_and_key() {
        assert_eq!(Cycle::Physical.to_string(), "Physical");
        assert_eq!(Cycle::Intellectual.key(), "intellectual");
        assert_eq!(serde_json::to_string(&Cycle::Emotional).unwrap(), "\"emotional\"");
    }
}
