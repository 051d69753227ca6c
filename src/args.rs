use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::anthropic::DEFAULT_MODEL;

/// Avocado plant monitoring system
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Use real Raspberry Pi sensors instead of mock data
    #[arg(long)]
    pub real: bool,

    /// Seconds between readings
    #[arg(long, env = "PLANT_MONITOR_INTERVAL", default_value_t = 10)]
    pub interval: u64,

    /// Seconds between AI recommendations
    #[arg(long, env = "PLANT_MONITOR_AI_INTERVAL", default_value_t = 60)]
    pub ai_interval: u64,

    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    #[arg(long, env = "ANTHROPIC_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the external telemetry API
    #[arg(long, env = "AIVOCADO_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, env = "AIVOCADO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "PLANT_MONITOR_LOG", default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Args {
    /// At least one second; a zero period would spin.
    pub fn reading_interval(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }

    pub fn advisory_interval(&self) -> Duration {
        Duration::from_secs(self.ai_interval)
    }

    pub fn anthropic_api_key(&self) -> Option<&str> {
        self.anthropic_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
