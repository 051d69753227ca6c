use crate::{
    anthropic::AnthropicClient,
    metric::Metric,
    range::{Ranges, Status},
    reading::Reading,
};

pub const ALL_CLEAR: &str = "All conditions optimal! Your avocado plant is in a great environment.";
pub const ISSUE_SEPARATOR: &str = " | ";
pub const MAX_ISSUES: usize = 2;

fn issue(metric: Metric, status: Status) -> Option<&'static str> {
    let text = match (metric, status) {
        (_, Status::Within) => return None,
        (Metric::Temperature, Status::Below) => "Temperature too low - consider warming the area",
        (Metric::Temperature, Status::Above) => "Temperature too high - improve ventilation",
        (Metric::Humidity, Status::Below) => "Humidity too low - mist leaves or use humidifier",
        (Metric::Humidity, Status::Above) => "Humidity too high - improve air circulation",
        (Metric::Co2, Status::Below) => "CO2 below normal - ensure adequate ventilation",
        (Metric::Co2, Status::Above) => "CO2 elevated - increase fresh air exchange",
        (Metric::Light, Status::Below) => {
            "Light insufficient - move closer to window or add grow light"
        }
        (Metric::Light, Status::Above) => "Light too intense - add shade or move plant",
    };
    Some(text)
}

/// Rule-based advisory: the two highest-priority out-of-range conditions,
/// or [`ALL_CLEAR`].
pub fn fallback_recommendation(reading: &Reading, ranges: &Ranges) -> String {
    let issues: Vec<&str> = Metric::ALL
        .into_iter()
        .filter_map(|metric| issue(metric, ranges.get(metric).classify(metric.value(reading))))
        .take(MAX_ISSUES)
        .collect();

    if issues.is_empty() {
        return ALL_CLEAR.to_string();
    }

    issues.join(ISSUE_SEPARATOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub text: String,
    pub source: Source,
}

/// Asks the model when one is configured, otherwise or on failure uses
/// [`fallback_recommendation`].
#[derive(Debug)]
pub struct Advisor {
    client: Option<AnthropicClient>,
    ranges: Ranges,
}

impl Advisor {
    pub fn new(client: Option<AnthropicClient>, ranges: Ranges) -> Self {
        Self { client, ranges }
    }

    pub async fn advise(&self, reading: &Reading) -> Advisory {
        if let Some(client) = &self.client {
            match client.recommend(reading).await {
                Ok(text) => {
                    return Advisory {
                        text,
                        source: Source::Model,
                    };
                }
                Err(e) => log::warn!("AI advisory unavailable, using rule-based advice: {e}"),
            }
        }

        Advisory {
            text: fallback_recommendation(reading, &self.ranges),
            source: Source::Fallback,
        }
    }
}
