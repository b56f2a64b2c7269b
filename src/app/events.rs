//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::fsm::StateId;
use crate::fsm::context::DogLocation;
use crate::weather::Condition;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// The schedule moved the FSM between states.
    StateChanged { from: StateId, to: StateId },

    /// The daily weather refresh succeeded.
    WeatherRefreshed {
        condition: Condition,
        /// `None` until the thermometer has answered once.
        temperature_c: Option<f32>,
    },

    /// The daily weather refresh failed; the previous snapshot is kept.
    WeatherStale,

    /// The dog crossed the door during this tick.
    DogMoved(DogLocation),
}
