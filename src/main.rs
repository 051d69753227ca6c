use std::{
    io::{self, Write as _},
    process::ExitCode,
    time::Instant,
};

use anyhow::Context as _;
use clap::Parser as _;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use log::LevelFilter;
use plant_monitor::{
    advisor::Advisor,
    anthropic::AnthropicClient,
    args::Args,
    mock::MockSensor,
    monitor::Monitor,
    range::Ranges,
    sensor::{RaspberryPiSensor, SensorSource, WithFallback},
    telemetry::TelemetryClient,
};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use tokio::time::MissedTickBehavior;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logger(args.log_level) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = run(args).await {
        log::error!("{e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logger(level: LevelFilter) -> Result<(), anyhow::Error> {
    TermLogger::init(
        level,
        ConfigBuilder::new()
            .set_time_format_rfc3339()
            .set_time_offset_to_local()
            .map_err(|_| anyhow::anyhow!("Failed to set time offset to local"))?
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")
}

async fn run(args: Args) -> Result<(), anyhow::Error> {
    let ranges = Ranges::default();

    let sensor: Box<dyn SensorSource + Send> = if args.real {
        Box::new(WithFallback::new(RaspberryPiSensor::new()))
    } else {
        Box::new(MockSensor::default())
    };

    let client = match args.anthropic_api_key() {
        Some(key) => {
            log::info!("AI model: {}", args.model);
            Some(AnthropicClient::new(key, &args.model).context("Failed to initialize AI client")?)
        }
        None => {
            log::info!("ANTHROPIC_API_KEY not set, using rule-based recommendations");
            None
        }
    };
    let advisor = Advisor::new(client, ranges.clone());
    let telemetry = TelemetryClient::from_config(args.api_url.as_deref(), args.api_key.as_deref());
    if telemetry.is_enabled() {
        log::info!("Pushing readings to {}", args.api_url.as_deref().unwrap_or_default());
    }

    if args.advisory_interval() < args.reading_interval() {
        log::warn!(
            "AI interval ({}s) is shorter than the reading interval ({}s); advising on every reading",
            args.ai_interval,
            args.reading_interval().as_secs()
        );
    }

    let mut monitor = Monitor::new(sensor, advisor, telemetry, ranges, args.advisory_interval());

    log::info!("Starting Avocado Plant Monitoring System...");
    log::info!("Mode: {}", monitor.describe_sensor());
    log::info!("Reading interval: {}s", args.reading_interval().as_secs());
    log::info!("AI recommendation interval: {}s", args.ai_interval);

    let mut ticker = tokio::time::interval(args.reading_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("Failed to wait for Ctrl+C signal")?;
                break;
            }
            frame = async {
                ticker.tick().await;
                monitor.step(Instant::now()).await
            } => {
                draw(&frame).context("Failed to draw dashboard")?;
            }
        }
    }

    println!("\n\nMonitoring stopped. Goodbye!");

    Ok(())
}

fn draw(frame: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    stdout.write_all(frame.as_bytes())?;
    stdout.flush()
}
