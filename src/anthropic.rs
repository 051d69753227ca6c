//! Client for the Anthropic Messages API.
//!
//! Only the single-turn, non-streaming request needed for a short plant
//! recommendation is supported.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reading::Reading;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const API_VERSION: &str = "2023-06-01";

const MAX_TOKENS: u32 = 150;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const SYSTEM_PROMPT: &str = "\
You are an expert botanist specializing in avocado plant cultivation.
Your role is to analyze sensor readings from an avocado plant monitoring system and provide
concise, actionable recommendations to optimize plant growth.

Optimal conditions for avocado plants:
- Temperature: 18-26°C (avoid frost and extreme heat)
- Humidity: 50-70% (moderate humidity)
- CO2: 400-800 ppm (normal atmospheric to slightly elevated)
- Light: 2,000-10,000 lux (bright indirect light, avocados are understory trees)

Keep your responses brief (2-3 sentences max) and focus on the most important adjustment needed.
If all readings are optimal, provide a short encouraging status update.";

/// Recoverable failures of the recommendation service.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AdvisoryError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, model: &str) -> Result<Self, AdvisoryError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub async fn recommend(&self, reading: &Reading) -> Result<String, AdvisoryError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: build_prompt(reading),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AdvisoryError::Status { status, body });
        }

        let body = response.text().await?;
        extract_text(&body)
    }
}

pub fn build_prompt(reading: &Reading) -> String {
    format!(
        "Current sensor readings for my avocado plant:
- Temperature: {:.1}°C
- Humidity: {:.1}%
- CO2: {:.0} ppm
- Light: {:.0} lux

What adjustments should I make for optimal growth?",
        reading.temperature_c, reading.humidity_percent, reading.co2_ppm, reading.light_lux,
    )
}

/// First text block of a Messages API response body.
pub fn extract_text(body: &str) -> Result<String, AdvisoryError> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;

    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        })
        .ok_or_else(|| AdvisoryError::MalformedResponse("no text content".to_string()))
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}
