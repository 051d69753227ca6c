use chrono::{DateTime, Local};
use thiserror::Error;

pub const HUMIDITY_MAX: f64 = 100.0;
/// Outdoor air never drops below this; lower values are sensor artefacts.
pub const CO2_FLOOR: f64 = 300.0;

/// One snapshot of the four plant metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Local>,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub co2_ppm: f64,
    pub light_lux: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidReading {
    #[error("humidity {0}% outside 0-100%")]
    Humidity(f64),

    #[error("CO2 {0} ppm below the 300 ppm floor")]
    Co2(f64),

    #[error("negative light level {0} lux")]
    Light(f64),

    #[error("temperature {0} C is not a number")]
    Temperature(f64),
}

impl Reading {
    /// Checks the physical bounds every reading must satisfy.
    pub fn validate(&self) -> Result<(), InvalidReading> {
        if !self.temperature_c.is_finite() {
            return Err(InvalidReading::Temperature(self.temperature_c));
        }
        if !(0.0..=HUMIDITY_MAX).contains(&self.humidity_percent) {
            return Err(InvalidReading::Humidity(self.humidity_percent));
        }
        if !(self.co2_ppm >= CO2_FLOOR) {
            return Err(InvalidReading::Co2(self.co2_ppm));
        }
        if !(self.light_lux >= 0.0) {
            return Err(InvalidReading::Light(self.light_lux));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn reading(
    temperature_c: f64,
    humidity_percent: f64,
    co2_ppm: f64,
    light_lux: f64,
) -> Reading {
    Reading {
        timestamp: Local::now(),
        temperature_c,
        humidity_percent,
        co2_ppm,
        light_lux,
    }
}
