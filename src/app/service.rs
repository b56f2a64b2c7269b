//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the FSM, the time scheduler, and the shared context.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!   TemperaturePort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!       WeatherPort ──▶ │       AppService        │
//!                       │  Scheduler · FSM · ctx  │
//!      DoorHardware ◀──│                         │──▶ NotificationPort
//!                       └─────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::fsm::context::{DogLocation, FsmContext, GateIo};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::scheduler::TimeScheduler;
use crate::weather::WeatherSnapshot;

use super::events::AppEvent;
use super::ports::{DoorHardware, EventSink, NotificationPort, TemperaturePort, WeatherPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    scheduler: TimeScheduler,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration and the boot-time weather.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, weather: WeatherSnapshot) -> Self {
        let scheduler = TimeScheduler::new(&config);
        let ctx = FsmContext::new(config, weather);
        let fsm = Fsm::new(build_state_table(), StateId::MustStayIn);

        Self {
            fsm,
            ctx,
            scheduler,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the initial state (MustStayIn): both gates locked before the
    /// schedule is evaluated for the first time.
    pub fn start(
        &mut self,
        hw: &mut impl DoorHardware,
        notifier: &mut impl NotificationPort,
        sink: &mut impl EventSink,
    ) {
        let mut io = GateIo::new(&mut *hw, &mut *notifier);
        self.fsm.start(&mut self.ctx, &mut io);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle:
    /// temperature → daily weather refresh → schedule → transition → update.
    ///
    /// `hw` satisfies both [`DoorHardware`] and [`TemperaturePort`], and
    /// `link` both [`WeatherPort`] and [`NotificationPort`]; this avoids
    /// double mutable borrows while keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now: NaiveDateTime,
        hw: &mut (impl DoorHardware + TemperaturePort),
        link: &mut (impl WeatherPort + NotificationPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();
        let prev_location = self.ctx.dog_location;

        // 1. Ambient temperature (keep the last good value on failure)
        match hw.read_temperature() {
            Ok(t) => self.ctx.temperature_c = Some(t),
            Err(e) => warn!(
                "Temperature read failed, keeping {:?}: {}",
                self.ctx.temperature_c, e
            ),
        }

        // 2. Daily weather refresh
        if self.scheduler.weather_refresh_due(now, self.ctx.weather.date()) {
            self.refresh_weather(link, sink);
        }

        let mut io = GateIo::new(&mut *hw, &mut *link);

        // 3. Schedule → transition (no-op when already there)
        match self.scheduler.select(now.time(), &self.ctx.weather) {
            Some(target) => {
                self.fsm.transition_to(target, &mut self.ctx, &mut io);
            }
            None => warn!("No schedule window covers {}, staying in {:?}", now.time(), prev_state),
        }

        // 4. State update (badge poll, gates, door sample)
        self.fsm.update(&mut self.ctx, &mut io);

        // 5. Events
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
        if self.ctx.dog_location != prev_location {
            sink.emit(&AppEvent::DogMoved(self.ctx.dog_location));
        }
    }

    fn refresh_weather(&mut self, link: &mut impl WeatherPort, sink: &mut impl EventSink) {
        match link.request_weather() {
            Ok(snapshot) => {
                info!(
                    "Weather updated: {}, sunrise: {}, sunset: {}",
                    snapshot.condition, snapshot.sunrise, snapshot.sunset
                );
                self.ctx.weather = snapshot;
                sink.emit(&AppEvent::WeatherRefreshed {
                    condition: snapshot.condition,
                    temperature_c: self.ctx.temperature_c,
                });
            }
            Err(e) => {
                warn!("Weather refresh failed, keeping cached data: {}", e);
                sink.emit(&AppEvent::WeatherStale);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn dog_location(&self) -> DogLocation {
        self.ctx.dog_location
    }

    pub fn weather(&self) -> &WeatherSnapshot {
        &self.ctx.weather
    }

    /// Last good ambient reading, `None` before the first one.
    pub fn temperature_c(&self) -> Option<f32> {
        self.ctx.temperature_c
    }

    /// Door events counted since the current state was entered.
    pub fn visits(&self) -> u32 {
        self.ctx.session.visits
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }
}
