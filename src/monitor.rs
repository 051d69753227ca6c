use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use crate::{
    advisor::Advisor, alert::AlertTracker, dashboard, mock::MockSensor, range::Ranges,
    reading::Reading, sensor::SensorSource, telemetry::TelemetryClient,
};

type SharedSensor = Arc<Mutex<Box<dyn SensorSource + Send>>>;

/// One pass of the monitoring loop: read, push, alert, advise when due, render.
pub struct Monitor {
    sensor: SharedSensor,
    sensor_name: &'static str,
    advisor: Advisor,
    telemetry: TelemetryClient,
    alerts: AlertTracker,
    ranges: Ranges,
    advisory_interval: Duration,
    last_advisory: Option<Instant>,
    advisory: Option<String>,
}

impl Monitor {
    pub fn new(
        sensor: Box<dyn SensorSource + Send>,
        advisor: Advisor,
        telemetry: TelemetryClient,
        ranges: Ranges,
        advisory_interval: Duration,
    ) -> Self {
        Self {
            sensor_name: sensor.describe(),
            sensor: Arc::new(Mutex::new(sensor)),
            advisor,
            telemetry,
            alerts: AlertTracker::new(ranges.clone()),
            ranges,
            advisory_interval,
            last_advisory: None,
            advisory: None,
        }
    }

    pub fn describe_sensor(&self) -> &'static str {
        self.sensor_name
    }

    /// Hardware reads block (UART timeouts, conversion delays), so they run
    /// on the blocking pool and leave the runtime free to see Ctrl+C.
    async fn read_sensor(&self) -> Reading {
        let sensor = Arc::clone(&self.sensor);
        let read = tokio::task::spawn_blocking(move || {
            sensor
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .read()
        });

        match read.await {
            Ok(reading) => reading,
            Err(e) => {
                log::error!("Sensor task failed, using simulated data: {e}");
                MockSensor::default().read()
            }
        }
    }

    fn advisory_due(&self, now: Instant) -> bool {
        self.last_advisory
            .is_none_or(|last| now.saturating_duration_since(last) >= self.advisory_interval)
    }

    /// Returns the dashboard frame for this pass.
    pub async fn step(&mut self, now: Instant) -> String {
        let reading = self.read_sensor().await;
        log::debug!("{reading:?}");

        self.telemetry.push_reading(&reading).await;

        for alert in self.alerts.observe(&reading) {
            log::info!("{}: {}", alert.kind, alert.message);
            self.telemetry
                .push_alert(alert.kind, &alert.message, Some(&reading))
                .await;
        }

        if self.advisory_due(now) {
            let advisory = self.advisor.advise(&reading).await;
            log::info!("Advisory ({:?}): {}", advisory.source, advisory.text);
            self.telemetry.push_analysis(&reading, &advisory.text).await;
            self.advisory = Some(advisory.text);
            self.last_advisory = Some(now);
        }

        dashboard::render(&reading, &self.ranges, self.advisory.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        advisor::ALL_CLEAR,
        reading::{Reading, reading},
    };

    struct Replay(Vec<Reading>);

    impl SensorSource for Replay {
        fn read(&mut self) -> Reading {
            self.0.remove(0)
        }

        fn describe(&self) -> &'static str {
            "replay"
        }
    }

    fn monitor(readings: Vec<Reading>, interval: Duration) -> Monitor {
        Monitor::new(
            Box::new(Replay(readings)),
            Advisor::new(None, Ranges::default()),
            TelemetryClient::disabled(),
            Ranges::default(),
            interval,
        )
    }

    #[tokio::test]
    async fn test_first_pass_advises() {
        let mut m = monitor(vec![reading(22.0, 60.0, 600.0, 5000.0)], Duration::from_secs(60));
        let frame = m.step(Instant::now()).await;
        assert!(frame.contains("AI RECOMMENDATIONS"));
        assert!(frame.contains("All conditions optimal!"));
        assert_eq!(m.advisory.as_deref(), Some(ALL_CLEAR));
    }

    #[tokio::test]
    async fn test_advisory_held_until_interval_elapses() {
        let mut m = monitor(
            vec![
                reading(22.0, 60.0, 600.0, 5000.0),
                reading(35.0, 60.0, 600.0, 5000.0),
                reading(35.0, 60.0, 600.0, 5000.0),
            ],
            Duration::from_secs(60),
        );
        let start = Instant::now();

        m.step(start).await;
        let frame = m.step(start + Duration::from_secs(10)).await;
        assert!(frame.contains("TEMPERATURE [HIGH]"));
        assert!(frame.contains("All conditions optimal!"));

        let frame = m.step(start + Duration::from_secs(60)).await;
        assert!(frame.contains("Temperature too high - improve ventilation"));
    }

    #[tokio::test]
    async fn test_zero_interval_advises_every_pass() {
        let mut m = monitor(
            vec![reading(22.0, 60.0, 600.0, 5000.0), reading(10.0, 60.0, 600.0, 5000.0)],
            Duration::ZERO,
        );
        let now = Instant::now();
        m.step(now).await;
        let frame = m.step(now).await;
        assert!(frame.contains("Temperature too low"));
    }

    struct Broken;

    impl SensorSource for Broken {
        fn read(&mut self) -> Reading {
            panic!("bus fault");
        }

        fn describe(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_sensor_read_runs_off_the_runtime_thread() {
        let mut m = Monitor::new(
            Box::new(Broken),
            Advisor::new(None, Ranges::default()),
            TelemetryClient::disabled(),
            Ranges::default(),
            Duration::from_secs(60),
        );
        assert_eq!(m.describe_sensor(), "broken");

        // The panic is confined to the blocking task; the pass still renders.
        let frame = m.step(Instant::now()).await;
        assert!(frame.contains("TEMPERATURE"));
        assert!(frame.contains("Press Ctrl+C to exit"));
    }
}
