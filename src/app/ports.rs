//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (RFID reader, flex sensor, servos, indicator, the peer
//! link) implement these traits.  The [`AppService`](super::service::AppService)
//! and the FSM state handlers consume them, so the domain core never touches
//! hardware or the UART directly.
//!
//! Two groups live here:
//!
//! - **Gate node ports**: what the controller needs from its own hardware
//!   ([`AccessPort`], [`DoorSensorPort`], [`ActuatorPort`], [`TemperaturePort`])
//!   and from the network node ([`TimeQueryPort`], [`WeatherPort`],
//!   [`NotificationPort`]).
//! - **Network node collaborators**: the services the peer server dispatches
//!   to ([`TimeSource`], [`WeatherProvider`], [`NotificationSink`]).

use core::time::Duration;

use chrono::NaiveDateTime;

use crate::drivers::Rgb;
use crate::drivers::gate::Gate;
use crate::error::{LinkError, SensorError};
use crate::link::message::Notification;
use crate::sensors::rfid::CredentialId;
use crate::weather::WeatherSnapshot;

// ───────────────────────────────────────────────────────────────
// Access port (driven adapter: RFID reader → domain)
// ───────────────────────────────────────────────────────────────

/// Result of one bounded credential poll.
///
/// A timeout is an expected outcome, not an error: most polls end that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The allow-listed tag was presented.
    Authorized,
    /// Some other tag was presented.
    Denied(CredentialId),
    /// Nothing was read before the deadline.
    Timeout,
}

pub trait AccessPort {
    /// Block for at most `deadline` waiting for a tag.
    fn poll_credential(&mut self, deadline: Duration) -> AccessOutcome;
}

// ───────────────────────────────────────────────────────────────
// Door sensor port
// ───────────────────────────────────────────────────────────────

pub trait DoorSensorPort {
    /// Sample the flap for `window` and report whether it was held open.
    fn door_operated(&mut self, window: Duration) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → servos / indicator)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the gates.
pub trait ActuatorPort {
    /// Lock or unlock one gate.  Repeating the current position is a no-op.
    fn lock(&mut self, gate: Gate, locked: bool);

    /// Set the indicator colour.
    fn set_indicator(&mut self, colour: Rgb);
}

// ───────────────────────────────────────────────────────────────
// Temperature port
// ───────────────────────────────────────────────────────────────

pub trait TemperaturePort {
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

/// Everything the state handlers drive during a tick.
///
/// Blanket-implemented, so any adapter providing the three ports can be
/// handed to the FSM as `&mut dyn DoorHardware`.
pub trait DoorHardware: AccessPort + DoorSensorPort + ActuatorPort {}

impl<T: AccessPort + DoorSensorPort + ActuatorPort> DoorHardware for T {}

// ───────────────────────────────────────────────────────────────
// Peer link ports (gate node → network node)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget push notification.
pub trait NotificationPort {
    fn notify(&mut self, notification: &Notification<'_>) -> Result<(), LinkError>;
}

pub trait WeatherPort {
    /// Ask the network node for current weather plus today's sunrise/sunset.
    fn request_weather(&mut self) -> Result<WeatherSnapshot, LinkError>;
}

pub trait TimeQueryPort {
    /// Ask the network node for the current local date and time.
    fn request_time(&mut self) -> Result<NaiveDateTime, LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter used for every bounded poll.
pub trait MonotonicClock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Network node collaborators
// ───────────────────────────────────────────────────────────────

/// Wall-clock source on the network node (NTP-synced RTC in production).
pub trait TimeSource {
    fn now(&mut self) -> NaiveDateTime;
}

/// Current-conditions provider (an HTTP weather API in production).
pub trait WeatherProvider {
    fn fetch(&mut self, latitude: f32, longitude: f32) -> anyhow::Result<WeatherSnapshot>;
}

/// Push-notification delivery (an ntfy-style HTTP endpoint in production).
pub trait NotificationSink {
    fn send(&mut self, title: &str, body: &str, tags: &str) -> anyhow::Result<()>;
}
