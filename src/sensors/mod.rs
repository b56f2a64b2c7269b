//! Sensor subsystem: RFID badge reader, flap position sensor, thermometer.
//!
//! Bus-level drivers (MFRC522 over SPI, the flex sensor's ADC channel,
//! SHT4x over I²C) implement the collaborator traits below.  The polling
//! logic that turns raw reads into controller decisions lives in [`rfid`]
//! and [`door`].

pub mod door;
pub mod rfid;

use crate::error::SensorError;
use rfid::CredentialId;

/// One non-blocking attempt to read a badge in the field.
pub trait CredentialReader {
    fn poll(&mut self) -> Option<CredentialId>;
}

/// Instantaneous raw reading of the flap position sensor.
pub trait PositionSensor {
    fn sample(&mut self) -> u16;
}

pub trait TemperatureSensor {
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}
