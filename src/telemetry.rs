//! Best-effort push of readings, analyses and alerts to an external API.
//!
//! Every push returns whether the service answered `200 OK`. Failures are
//! logged and dropped; nothing is queued or retried.

use std::time::Duration;

use chrono::Local;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::{alert::AlertKind, reading::Reading};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct Endpoint {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone)]
pub struct TelemetryClient {
    endpoint: Option<Endpoint>,
}

impl TelemetryClient {
    pub fn disabled() -> Self {
        Self { endpoint: None }
    }

    /// Disabled unless both the base URL and the API key are present.
    pub fn from_config(base_url: Option<&str>, api_key: Option<&str>) -> Self {
        let (Some(base_url), Some(api_key)) = (non_blank(base_url), non_blank(api_key)) else {
            log::info!("Telemetry disabled: missing AIVOCADO_API_URL or AIVOCADO_API_KEY");
            return Self::disabled();
        };

        let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                log::warn!("Telemetry disabled: failed to build HTTP client: {e}");
                return Self::disabled();
            }
        };

        Self {
            endpoint: Some(Endpoint {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// `POST /readings`
    pub async fn push_reading(&self, reading: &Reading) -> bool {
        let payload = ReadingPayload {
            timestamp: reading.timestamp.to_rfc3339(),
            values: reading.into(),
        };
        self.post("readings", &payload).await
    }

    /// `POST /analysis`
    pub async fn push_analysis(&self, reading: &Reading, recommendation: &str) -> bool {
        let payload = AnalysisPayload {
            timestamp: Local::now().to_rfc3339(),
            reading: reading.into(),
            recommendation,
        };
        self.post("analysis", &payload).await
    }

    /// `POST /alerts`
    pub async fn push_alert(&self, kind: AlertKind, message: &str, reading: Option<&Reading>) -> bool {
        let payload = AlertPayload {
            timestamp: Local::now().to_rfc3339(),
            kind: kind.to_string(),
            message,
            reading: reading.map(Values::from),
        };
        self.post("alerts", &payload).await
    }

    async fn post<T: Serialize>(&self, path: &str, payload: &T) -> bool {
        let Some(endpoint) = &self.endpoint else {
            return false;
        };

        let result = endpoint
            .client
            .post(format!("{}/{path}", endpoint.base_url))
            .bearer_auth(&endpoint.api_key)
            .json(payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                log::warn!("Telemetry push to /{path} rejected: HTTP {}", response.status());
                false
            }
            Err(e) => {
                log::warn!("Telemetry push to /{path} failed: {e}");
                false
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
struct Values {
    temperature_c: f64,
    humidity_percent: f64,
    co2_ppm: f64,
    light_lux: f64,
}

impl From<&Reading> for Values {
    fn from(r: &Reading) -> Self {
        Self {
            temperature_c: r.temperature_c,
            humidity_percent: r.humidity_percent,
            co2_ppm: r.co2_ppm,
            light_lux: r.light_lux,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReadingPayload {
    timestamp: String,
    #[serde(flatten)]
    values: Values,
}

#[derive(Debug, Serialize)]
struct AnalysisPayload<'a> {
    timestamp: String,
    reading: Values,
    recommendation: &'a str,
}

#[derive(Debug, Serialize)]
struct AlertPayload<'a> {
    timestamp: String,
    #[serde(rename = "type")]
    kind: String,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reading: Option<Values>,
}
