use std::fmt;

use thiserror::Error;

use crate::metric::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Below,
    Within,
    Above,
}

impl Status {
    pub fn token(self) -> &'static str {
        match self {
            Status::Below => "[LOW]",
            Status::Within => "[OK]",
            Status::Above => "[HIGH]",
        }
    }
}

/// Classifies `value` against the closed interval `[low, high]`.
pub fn classify(value: f64, low: f64, high: f64) -> Status {
    if value < low {
        Status::Below
    } else if value > high {
        Status::Above
    } else {
        Status::Within
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid range: low {low} must be finite and below high {high}")]
pub struct InvalidRange {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalRange {
    low: f64,
    high: f64,
}

impl OptimalRange {
    pub fn new(low: f64, high: f64) -> Result<Self, InvalidRange> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn classify(&self, value: f64) -> Status {
        classify(value, self.low, self.high)
    }
}

impl fmt::Display for OptimalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Optimal range per metric. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranges {
    pub temperature: OptimalRange,
    pub humidity: OptimalRange,
    pub co2: OptimalRange,
    pub light: OptimalRange,
}

impl Ranges {
    pub fn get(&self, metric: Metric) -> &OptimalRange {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::Co2 => &self.co2,
            Metric::Light => &self.light,
        }
    }
}

impl Default for Ranges {
    // Avocado: bright indirect light, moderate humidity, no frost.
    fn default() -> Self {
        Self {
            temperature: OptimalRange { low: 18.0, high: 26.0 },
            humidity: OptimalRange { low: 50.0, high: 70.0 },
            co2: OptimalRange { low: 400.0, high: 800.0 },
            light: OptimalRange { low: 2000.0, high: 10000.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn test_boundaries_are_within() {
        assert_eq!(classify(18.0, 18.0, 26.0), Status::Within);
        assert_eq!(classify(26.0, 18.0, 26.0), Status::Within);
        assert_eq!(classify(17.99, 18.0, 26.0), Status::Below);
        assert_eq!(classify(26.01, 18.0, 26.0), Status::Above);
    }

    #[test]
    fn test_status_tokens() {
        assert_eq!(Status::Below.token(), "[LOW]");
        assert_eq!(Status::Within.token(), "[OK]");
        assert_eq!(Status::Above.token(), "[HIGH]");
    }

    #[test]
    fn test_new_rejects_empty_or_inverted() {
        assert_eq!(
            OptimalRange::new(5.0, 5.0),
            Err(InvalidRange { low: 5.0, high: 5.0 })
        );
        assert!(OptimalRange::new(10.0, 1.0).is_err());
        assert!(OptimalRange::new(f64::NAN, 1.0).is_err());
        assert!(OptimalRange::new(0.0, f64::INFINITY).is_err());
        assert!(OptimalRange::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn test_default_table_and_display() {
        let ranges = Ranges::default();
        assert_eq!(ranges.get(Metric::Temperature).to_string(), "18-26");
        assert_eq!(ranges.get(Metric::Humidity).to_string(), "50-70");
        assert_eq!(ranges.get(Metric::Co2).to_string(), "400-800");
        assert_eq!(ranges.get(Metric::Light).to_string(), "2000-10000");
    }

    #[quickcheck]
    fn prop_bounds_are_inclusive(a: f64, b: f64) -> TestResult {
        let Ok(range) = OptimalRange::new(a.min(b), a.max(b)) else {
            return TestResult::discard();
        };
        TestResult::from_bool(
            range.classify(range.low()) == Status::Within
                && range.classify(range.high()) == Status::Within,
        )
    }

    #[quickcheck]
    fn prop_outside_values_are_flagged(a: f64, b: f64) -> TestResult {
        let Ok(range) = OptimalRange::new(a.min(b), a.max(b)) else {
            return TestResult::discard();
        };
        let span = range.high() - range.low();
        let below = range.low() - span;
        let above = range.high() + span;
        if !below.is_finite() || !above.is_finite() || below == range.low() || above == range.high() {
            return TestResult::discard();
        }
        TestResult::from_bool(
            range.classify(below) == Status::Below && range.classify(above) == Status::Above,
        )
    }
}
