use std::time::Duration;

use anyhow::{Context as _, anyhow};
use backon::{BlockingRetryable as _, ConstantBuilder};
use bme280::i2c::BME280;
use chrono::Local;
use rppal::{hal::Delay, i2c::I2c};

use crate::{bh1750::BH1750, mh_z19::MHZ19, mock::MockSensor, reading::Reading};

pub trait SensorSource {
    /// Never fails; sources substitute simulated data instead.
    fn read(&mut self) -> Reading;

    fn describe(&self) -> &'static str;
}

/// Hardware that can fail to produce a reading.
pub trait FallibleSensor {
    fn measure(&mut self) -> Result<Reading, anyhow::Error>;
}

/// Reads from `primary`, substituting simulator output when it failed to
/// initialise, fails to measure, or measures outside physical bounds.
#[derive(Debug)]
pub struct WithFallback<S> {
    primary: Option<S>,
    fallback: MockSensor,
}

impl<S: FallibleSensor> WithFallback<S> {
    pub fn new(primary: Result<S, anyhow::Error>) -> Self {
        let primary = match primary {
            Ok(sensor) => Some(sensor),
            Err(e) => {
                log::warn!("Could not initialize sensors, using simulated data: {e:#}");
                None
            }
        };

        Self {
            primary,
            fallback: MockSensor::default(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.primary.is_none()
    }
}

impl<S: FallibleSensor> SensorSource for WithFallback<S> {
    fn read(&mut self) -> Reading {
        let Some(sensor) = self.primary.as_mut() else {
            return self.fallback.read();
        };

        let measured = sensor.measure().and_then(|reading| {
            reading
                .validate()
                .context("Implausible sensor reading")?;
            Ok(reading)
        });

        match measured {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("Sensor read failed, using simulated data: {e:#}");
                self.fallback.read()
            }
        }
    }

    fn describe(&self) -> &'static str {
        if self.is_degraded() {
            "Real sensors (unavailable, simulating)"
        } else {
            "Real sensors"
        }
    }
}

/// BME280 (temperature, humidity) and BH1750 (light) on I2C, MH-Z19 (CO2) on UART.
#[derive(Debug)]
pub struct RaspberryPiSensor {
    delay: Delay,
    bme280: BME280<I2c>,
    mh_z19: MHZ19,
    bh1750: BH1750,
}

impl RaspberryPiSensor {
    pub fn new() -> Result<RaspberryPiSensor, anyhow::Error> {
        let i2c = I2c::new().context("Failed to initialize I2C")?;
        let mut sensor = RaspberryPiSensor {
            delay: Delay,
            bme280: BME280::new_primary(i2c),
            mh_z19: MHZ19::new().context("Failed to initialize MH-Z19")?,
            bh1750: BH1750::new().context("Failed to initialize BH1750")?,
        };
        sensor.init()?;

        Ok(sensor)
    }

    fn init(&mut self) -> Result<(), anyhow::Error> {
        let retry_builder = ConstantBuilder::default()
            .with_delay(Duration::from_millis(100))
            .with_max_times(20);
        let notify = |e: &anyhow::Error, dur: Duration| {
            log::error!("{e:#}");
            log::info!("Retrying in {:?}", dur);
        };

        (|| {
            self.bme280
                .init(&mut self.delay)
                .map_err(|e| anyhow!("Failed to initialize BME280: {e:?}"))
        })
        .retry(retry_builder)
        .notify(notify)
        .call()?;

        (|| self.mh_z19.init())
            .retry(retry_builder)
            .notify(notify)
            .call()?;

        (|| self.bh1750.init())
            .retry(retry_builder)
            .notify(notify)
            .call()?;

        Ok(())
    }
}

impl FallibleSensor for RaspberryPiSensor {
    fn measure(&mut self) -> Result<Reading, anyhow::Error> {
        let m = self
            .bme280
            .measure(&mut self.delay)
            .map_err(|e| anyhow!("Failed to read BME280: {e:?}"))?;
        let co2_ppm = self.mh_z19.read_co2_ppm()?;
        let light_lux = self.bh1750.read_lux()?;

        Ok(Reading {
            timestamp: Local::now(),
            temperature_c: f64::from(m.temperature),
            humidity_percent: f64::from(m.humidity),
            co2_ppm: f64::from(co2_ppm),
            light_lux,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mh_z19::{checksum, decode_response},
        reading::reading,
    };

    struct Scripted {
        results: Vec<Result<Reading, anyhow::Error>>,
    }

    impl FallibleSensor for Scripted {
        fn measure(&mut self) -> Result<Reading, anyhow::Error> {
            self.results.remove(0)
        }
    }

    fn assert_simulated(r: &Reading) {
        assert!((20.0..=24.0).contains(&r.temperature_c), "{r:?}");
        assert!((4000.0..=6000.0).contains(&r.light_lux), "{r:?}");
    }

    #[test]
    fn test_init_failure_falls_back_to_simulator() {
        let mut source = WithFallback::<Scripted>::new(Err(anyhow!("no I2C bus")));
        assert!(source.is_degraded());
        assert_eq!(source.describe(), "Real sensors (unavailable, simulating)");
        for _ in 0..10 {
            assert_simulated(&source.read());
        }
    }

    #[test]
    fn test_measure_failure_substitutes_one_reading() {
        let hardware = Scripted {
            results: vec![
                Ok(reading(30.0, 40.0, 900.0, 100.0)),
                Err(anyhow!("checksum mismatch")),
                Ok(reading(31.0, 41.0, 901.0, 101.0)),
            ],
        };
        let mut source = WithFallback::new(Ok(hardware));
        assert!(!source.is_degraded());

        assert_eq!(source.read().temperature_c, 30.0);
        assert_simulated(&source.read());
        assert_eq!(source.read().temperature_c, 31.0);
    }

    #[test]
    fn test_preheating_co2_frame_is_replaced() {
        // MH-Z19 reports a well-formed 0 ppm frame while warming up.
        let mut frame = [0xff, 0x86, 0x00, 0x00, 0x47, 0x00, 0x00, 0x00, 0x00];
        frame[8] = checksum(&frame);
        let co2_ppm = decode_response(&frame).unwrap();
        assert_eq!(co2_ppm, 0);

        let hardware = Scripted {
            results: vec![
                Ok(reading(30.0, 40.0, f64::from(co2_ppm), 100.0)),
                Ok(reading(22.0, 101.0, 600.0, 100.0)),
                Ok(reading(22.0, 60.0, 600.0, -3.0)),
            ],
        };
        let mut source = WithFallback::new(Ok(hardware));

        for _ in 0..3 {
            let r = source.read();
            assert_eq!(r.validate(), Ok(()), "{r:?}");
            assert_simulated(&r);
        }
        assert!(!source.is_degraded());
    }
}
