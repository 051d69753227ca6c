use std::time::Duration;

use anyhow::Context as _;
use rppal::uart::{Parity, Uart};
use thiserror::Error;

pub const BAUD_RATE: u32 = 9600;
pub const FRAME_LEN: usize = 9;

/// "Read gas concentration" request.
pub const READ_COMMAND: [u8; FRAME_LEN] = [0xff, 0x01, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00, 0x79];

const START_BYTE: u8 = 0xff;
const READ_COMMAND_ID: u8 = 0x86;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("short response: expected {FRAME_LEN} bytes, got {0}")]
    Short(usize),

    #[error("unexpected header: start byte {start:#04x}, command {command:#04x}")]
    Header { start: u8, command: u8 },

    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    Checksum { expected: u8, actual: u8 },
}

/// Winsen MH-Z19 NDIR CO2 sensor on the primary UART.
#[derive(Debug)]
pub struct MHZ19 {
    uart: Uart,
}

impl MHZ19 {
    pub fn new() -> Result<MHZ19, anyhow::Error> {
        let uart = Uart::new(BAUD_RATE, Parity::None, 8, 1).context("Failed to open UART")?;

        Ok(MHZ19 { uart })
    }

    pub fn init(&mut self) -> Result<(), anyhow::Error> {
        self.uart
            .set_read_mode(FRAME_LEN as u8, Duration::from_secs(1))
            .context("Failed to set UART read mode")?;

        Ok(())
    }

    pub fn read_co2_ppm(&mut self) -> Result<u16, anyhow::Error> {
        self.uart
            .write(&READ_COMMAND)
            .context("Failed to send read command to MH-Z19")?;

        let mut response = [0u8; FRAME_LEN];
        let len = self
            .uart
            .read(&mut response)
            .context("Failed to read MH-Z19 response")?;

        Ok(decode_response(&response[..len])?)
    }
}

/// Decodes a read response into ppm, validating header and checksum.
pub fn decode_response(frame: &[u8]) -> Result<u16, FrameError> {
    let frame: &[u8; FRAME_LEN] = frame
        .try_into()
        .map_err(|_| FrameError::Short(frame.len()))?;

    if frame[0] != START_BYTE || frame[1] != READ_COMMAND_ID {
        return Err(FrameError::Header {
            start: frame[0],
            command: frame[1],
        });
    }

    let expected = checksum(frame);
    if frame[8] != expected {
        return Err(FrameError::Checksum {
            expected,
            actual: frame[8],
        });
    }

    Ok(u16::from_be_bytes([frame[2], frame[3]]))
}

/// Two's complement of the sum of bytes 1..=7.
pub fn checksum(frame: &[u8; FRAME_LEN]) -> u8 {
    frame[1..8]
        .iter()
        .fold(0u8, |sum, &b| sum.wrapping_add(b))
        .wrapping_neg()
}
