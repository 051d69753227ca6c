use std::{thread, time::Duration};

use anyhow::Context as _;
use rppal::i2c::I2c;

/// ADDR pin pulled low.
pub const ADDRESS: u16 = 0x23;

const POWER_ON: u8 = 0x01;
const CONTINUOUS_HIGH_RES: u8 = 0x10;
const CONVERSION_TIME: Duration = Duration::from_millis(180);

/// Raw counts per lux in high-resolution mode.
const COUNTS_PER_LUX: f64 = 1.2;

/// ROHM BH1750 ambient light sensor.
#[derive(Debug)]
pub struct BH1750 {
    i2c: I2c,
}

impl BH1750 {
    pub fn new() -> Result<BH1750, anyhow::Error> {
        let mut i2c = I2c::new().context("Failed to open I2C bus")?;
        i2c.set_slave_address(ADDRESS)
            .context("Failed to address BH1750")?;

        Ok(BH1750 { i2c })
    }

    pub fn init(&mut self) -> Result<(), anyhow::Error> {
        self.i2c
            .write(&[POWER_ON])
            .context("Failed to power on BH1750")?;
        self.i2c
            .write(&[CONTINUOUS_HIGH_RES])
            .context("Failed to set BH1750 measurement mode")?;
        thread::sleep(CONVERSION_TIME);

        Ok(())
    }

    pub fn read_lux(&mut self) -> Result<f64, anyhow::Error> {
        let mut raw = [0u8; 2];
        self.i2c
            .read(&mut raw)
            .context("Failed to read BH1750 measurement")?;

        Ok(raw_to_lux(raw))
    }
}

pub fn raw_to_lux(raw: [u8; 2]) -> f64 {
    f64::from(u16::from_be_bytes(raw)) / COUNTS_PER_LUX
}
