//! UART transport adapter (device target only).
//!
//! Implements [`Transport`] over the ESP-IDF UART driver.  Reads never
//! block: they return `Ok(0)` when the RX FIFO is empty, which the peer
//! client and server treat as "nothing yet".  `flush` waits for the TX
//! FIFO to drain.

use esp_idf_svc::hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_svc::hal::uart::{UartDriver, config::Config};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use crate::config::SystemConfig;
use crate::link::transport::Transport;

/// Driver settings for the peer link: configured baud, 8N1.
pub fn uart_config(config: &SystemConfig) -> Config {
    Config::new().baudrate(Hertz(config.uart_baud))
}

pub struct UartTransport<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartTransport<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.uart.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.uart.wait_tx_done(BLOCK)
    }
}
