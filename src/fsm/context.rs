//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It holds the dog's last known side of the door, the cached
//! weather, the latest temperature, the per-visit session counter and the
//! configuration.  It is owned by the
//! [`AppService`](crate::app::service::AppService); nothing here is global.
//!
//! [`GateIo`] bundles the ports a handler may drive during a tick.  It is
//! rebuilt by the service on every call, so handlers never hold hardware
//! between ticks.

use crate::app::ports::{DoorHardware, NotificationPort};
use crate::config::SystemConfig;
use crate::link::message::Notification;
use crate::weather::WeatherSnapshot;
use log::warn;

// ---------------------------------------------------------------------------
// Dog location
// ---------------------------------------------------------------------------

/// Which side of the door the dog was last seen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DogLocation {
    #[default]
    Inside,
    Outside,
}

impl DogLocation {
    /// The other side of the door.
    pub fn toggled(self) -> Self {
        match self {
            Self::Inside => Self::Outside,
            Self::Outside => Self::Inside,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-visit session
// ---------------------------------------------------------------------------

/// State-local bookkeeping, reset by the engine on every `on_enter`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSession {
    /// Door events (or quiet authorised checks in MustStayIn) this visit.
    pub visits: u32,
}

impl StateSession {
    pub fn record_visit(&mut self) {
        self.visits = self.visits.saturating_add(1);
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Domain state --
    pub dog_location: DogLocation,
    /// Last good weather snapshot; replaced only by a successful refresh.
    pub weather: WeatherSnapshot,
    /// Latest ambient temperature (°C).  Kept on a failed read; `None`
    /// until the first successful one.
    pub temperature_c: Option<f32>,
    pub session: StateSession,

    // -- Configuration --
    pub config: SystemConfig,
}

impl FsmContext {
    /// Create a new context.  The dog starts inside.
    pub fn new(config: SystemConfig, weather: WeatherSnapshot) -> Self {
        Self {
            dog_location: DogLocation::Inside,
            weather,
            temperature_c: None,
            session: StateSession::default(),
            config,
        }
    }

    /// True when the out-door may open: the cached condition is on the
    /// allow list and a known temperature lies strictly inside the range.
    pub fn outdoor_weather_ok(&self) -> bool {
        let c = &self.config;
        c.outdoor_conditions.contains(&self.weather.condition)
            && self
                .temperature_c
                .is_some_and(|t| t > c.min_outdoor_temp_c && t < c.max_outdoor_temp_c)
    }

    pub fn credential_deadline(&self) -> core::time::Duration {
        core::time::Duration::from_millis(u64::from(self.config.credential_deadline_ms))
    }

    pub fn door_window(&self) -> core::time::Duration {
        core::time::Duration::from_millis(u64::from(self.config.door_window_ms))
    }
}

// ---------------------------------------------------------------------------
// GateIo
// ---------------------------------------------------------------------------

/// Ports available to state handlers for the duration of one call.
pub struct GateIo<'a> {
    pub hw: &'a mut dyn DoorHardware,
    pub notifier: &'a mut dyn NotificationPort,
}

impl<'a> GateIo<'a> {
    pub fn new(hw: &'a mut dyn DoorHardware, notifier: &'a mut dyn NotificationPort) -> Self {
        Self { hw, notifier }
    }

    /// Send a notification.  Delivery is best-effort: failures are logged
    /// and the control loop carries on.
    pub fn notify(&mut self, notification: &Notification<'_>) {
        if let Err(e) = self.notifier.notify(notification) {
            warn!("Notification '{}' not sent: {}", notification.title, e);
        }
    }
}
