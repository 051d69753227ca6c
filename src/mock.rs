//! Simulated sensors for running without hardware.
//!
//! Each read is a fixed baseline plus bounded uniform noise, clamped to the
//! physical floors of each metric. Nothing carries over between reads.

use chrono::Local;
use rand::Rng;

use crate::{
    reading::{CO2_FLOOR, HUMIDITY_MAX, Reading},
    sensor::SensorSource,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baselines {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub co2_ppm: f64,
    pub light_lux: f64,
}

impl Default for Baselines {
    fn default() -> Self {
        Self {
            temperature_c: 22.0,
            humidity_percent: 65.0,
            co2_ppm: 450.0,
            light_lux: 5000.0,
        }
    }
}

/// Half-width of the symmetric noise window per metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Noise {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub co2_ppm: f64,
    pub light_lux: f64,
}

impl Default for Noise {
    fn default() -> Self {
        Self {
            temperature_c: 2.0,
            humidity_percent: 5.0,
            co2_ppm: 50.0,
            light_lux: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockSensor {
    baselines: Baselines,
    noise: Noise,
}

impl MockSensor {
    pub fn new(baselines: Baselines, noise: Noise) -> Self {
        Self { baselines, noise }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Reading {
        let b = &self.baselines;
        let n = &self.noise;

        Reading {
            timestamp: Local::now(),
            temperature_c: b.temperature_c + jitter(rng, n.temperature_c),
            humidity_percent: (b.humidity_percent + jitter(rng, n.humidity_percent))
                .clamp(0.0, HUMIDITY_MAX),
            co2_ppm: (b.co2_ppm + jitter(rng, n.co2_ppm)).max(CO2_FLOOR),
            light_lux: (b.light_lux + jitter(rng, n.light_lux)).max(0.0),
        }
    }
}

impl SensorSource for MockSensor {
    fn read(&mut self) -> Reading {
        self.sample(&mut rand::thread_rng())
    }

    fn describe(&self) -> &'static str {
        "Mock sensors (testing)"
    }
}

fn jitter<R: Rng>(rng: &mut R, half_width: f64) -> f64 {
    let half_width = half_width.abs();
    rng.gen_range(-half_width..=half_width)
}
