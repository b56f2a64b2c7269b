//! Gate node composition root.
//!
//! [`GateNode`] wires the application service to its adapters and owns
//! the boot sequence:
//!
//! 1. validate the configuration,
//! 2. ask the network node for the time (retried until it answers) and
//!    anchor the [`WallClock`],
//! 3. ask for today's weather, falling back to a stale placeholder,
//! 4. start the FSM in MustStayIn.
//!
//! After boot, [`run`](GateNode::run) ticks the service forever.

use log::{info, warn};

use crate::adapters::time::WallClock;
use crate::app::ports::{
    DoorHardware, EventSink, MonotonicClock, NotificationPort, TemperaturePort, TimeQueryPort,
    WeatherPort,
};
use crate::app::service::AppService;
use crate::config::SystemConfig;
use crate::error::Result;
use crate::weather::WeatherSnapshot;

pub struct GateNode<H, L, C, E> {
    app: AppService,
    hw: H,
    link: L,
    clock: C,
    wall: WallClock,
    sink: E,
}

impl<H, L, C, E> GateNode<H, L, C, E>
where
    H: DoorHardware + TemperaturePort,
    L: TimeQueryPort + WeatherPort + NotificationPort,
    C: MonotonicClock,
    E: EventSink,
{
    /// Run the boot sequence and return a node ready to tick.
    ///
    /// Only an invalid configuration fails; link errors are retried (time)
    /// or absorbed (weather).
    pub fn boot(
        config: SystemConfig,
        mut hw: H,
        mut link: L,
        clock: C,
        mut sink: E,
    ) -> Result<Self> {
        config.validate()?;

        let now = loop {
            match link.request_time() {
                Ok(now) => break now,
                Err(e) => warn!("Time sync failed, retrying: {}", e),
            }
        };
        let wall = WallClock::anchor(now, &clock);
        info!("Time synced: {}", now);

        let weather = match link.request_weather() {
            Ok(snapshot) => {
                info!(
                    "Boot weather: {}, sunrise: {}, sunset: {}",
                    snapshot.condition, snapshot.sunrise, snapshot.sunset
                );
                snapshot
            }
            Err(e) => {
                warn!("Boot weather unavailable ({}), using fallback", e);
                WeatherSnapshot::fallback(
                    now.date(),
                    config.fallback_sunrise,
                    config.fallback_sunset,
                )
            }
        };

        let mut app = AppService::new(config, weather);
        app.start(&mut hw, &mut link, &mut sink);

        Ok(Self {
            app,
            hw,
            link,
            clock,
            wall,
            sink,
        })
    }

    /// One control-loop iteration at the current wall-clock time.
    pub fn run_once(&mut self) {
        let now = self.wall.now(&self.clock);
        self.app.tick(now, &mut self.hw, &mut self.link, &mut self.sink);
    }

    pub fn run(&mut self) -> ! {
        info!("Gate node running");
        loop {
            self.run_once();
        }
    }

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
