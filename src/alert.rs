use std::{collections::HashMap, fmt};

use crate::{
    metric::Metric,
    range::{Ranges, Status},
    reading::Reading,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertKind {
    pub metric: Metric,
    pub status: Status,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.status {
            Status::Below => "low",
            Status::Within => "ok",
            Status::Above => "high",
        };
        write!(f, "{}_{direction}", self.metric.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

/// Raises an alert when a metric leaves its optimal range, once per
/// excursion rather than on every reading.
#[derive(Debug)]
pub struct AlertTracker {
    ranges: Ranges,
    last: HashMap<Metric, Status>,
}

impl AlertTracker {
    pub fn new(ranges: Ranges) -> Self {
        Self {
            ranges,
            last: HashMap::new(),
        }
    }

    pub fn observe(&mut self, reading: &Reading) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for metric in Metric::ALL {
            let range = self.ranges.get(metric);
            let value = metric.value(reading);
            let status = range.classify(value);
            let previous = self.last.insert(metric, status).unwrap_or(Status::Within);

            if status == Status::Within || status == previous {
                continue;
            }

            let side = if status == Status::Below { "below" } else { "above" };
            alerts.push(Alert {
                kind: AlertKind { metric, status },
                message: format!(
                    "{} is {side} optimal range ({}, optimal {range} {})",
                    metric.name(),
                    metric.format_value(value),
                    metric.unit(),
                ),
            });
        }

        alerts
    }
}
