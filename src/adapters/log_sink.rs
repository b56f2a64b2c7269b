//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::WeatherRefreshed {
                condition,
                temperature_c,
            } => {
                match temperature_c {
                    Some(t) => info!("WEATHER | condition={} | T={:.1}\u{00b0}C", condition, t),
                    None => info!("WEATHER | condition={} | T=unknown", condition),
                }
            }
            AppEvent::WeatherStale => {
                warn!("WEATHER | refresh failed, using cached snapshot");
            }
            AppEvent::DogMoved(location) => {
                info!("DOG | now {:?}", location);
            }
        }
    }
}
