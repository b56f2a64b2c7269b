//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the access gate, the door sensor, the thermometer, both gate
//! drivers and the status LED, exposing them through [`AccessPort`],
//! [`DoorSensorPort`], [`ActuatorPort`] and [`TemperaturePort`].  This is
//! the only module in the system that touches actual hardware.

use core::time::Duration;

use crate::app::ports::{
    AccessOutcome, AccessPort, ActuatorPort, DoorSensorPort, MonotonicClock, TemperaturePort,
};
use crate::drivers::gate::{Gate, GateDriver};
use crate::drivers::status_led::StatusLed;
use crate::drivers::{GateActuator, IndicatorStrip, Rgb};
use crate::error::SensorError;
use crate::sensors::door::DoorSensor;
use crate::sensors::rfid::AccessGate;
use crate::sensors::{CredentialReader, PositionSensor, TemperatureSensor};

/// Concrete adapter that combines all gate-node hardware behind port traits.
pub struct HardwareAdapter<R, P, T, A, S, C> {
    access: AccessGate<R, C>,
    door: DoorSensor<P, C>,
    thermometer: T,
    gates: [GateDriver<A>; 2],
    led: StatusLed<S>,
}

impl<R, P, T, A, S, C> HardwareAdapter<R, P, T, A, S, C>
where
    R: CredentialReader,
    P: PositionSensor,
    T: TemperatureSensor,
    A: GateActuator,
    S: IndicatorStrip,
    C: MonotonicClock,
{
    /// `inward` and `outward` are driven to the locked position here.
    pub fn new(
        access: AccessGate<R, C>,
        door: DoorSensor<P, C>,
        thermometer: T,
        inward: A,
        outward: A,
        strip: S,
    ) -> Self {
        Self {
            access,
            door,
            thermometer,
            gates: [
                GateDriver::new(Gate::Inward, inward),
                GateDriver::new(Gate::Outward, outward),
            ],
            led: StatusLed::new(strip),
        }
    }

    pub fn is_locked(&self, gate: Gate) -> bool {
        self.gates[gate as usize].is_locked()
    }

    pub fn indicator(&self) -> Option<Rgb> {
        self.led.current_colour()
    }
}

// ── AccessPort / DoorSensorPort ───────────────────────────────

impl<R, P, T, A, S, C> AccessPort for HardwareAdapter<R, P, T, A, S, C>
where
    R: CredentialReader,
    C: MonotonicClock,
{
    fn poll_credential(&mut self, deadline: Duration) -> AccessOutcome {
        self.access.poll(deadline)
    }
}

impl<R, P, T, A, S, C> DoorSensorPort for HardwareAdapter<R, P, T, A, S, C>
where
    P: PositionSensor,
    C: MonotonicClock,
{
    fn door_operated(&mut self, window: Duration) -> bool {
        self.door.sample(window)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<R, P, T, A, S, C> ActuatorPort for HardwareAdapter<R, P, T, A, S, C>
where
    A: GateActuator,
    S: IndicatorStrip,
{
    fn lock(&mut self, gate: Gate, locked: bool) {
        self.gates[gate as usize].set_locked(locked);
    }

    fn set_indicator(&mut self, colour: Rgb) {
        self.led.set_colour(colour);
    }
}

// ── TemperaturePort implementation ────────────────────────────

impl<R, P, T, A, S, C> TemperaturePort for HardwareAdapter<R, P, T, A, S, C>
where
    T: TemperatureSensor,
{
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.thermometer.read_celsius()
    }
}
