//! Gate lock driver.
//!
//! Each side of the flap has its own servo-driven bolt.  The driver
//! remembers the last commanded position and skips repeat commands, so the
//! state handlers can re-assert a baseline every tick without the servo
//! twitching.
//!
//! ## Servo mapping
//!
//! Standard 50 Hz hobby servo: 0° (locked) is a 500 µs pulse, 180°
//! (unlocked) is 2500 µs, within a 20 ms period.

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use super::GateActuator;

/// Which gate.  Doubles as an index into `[inward, outward]` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Gate {
    /// Lets the dog come in.
    Inward = 0,
    /// Lets the dog go out.
    Outward = 1,
}

// ── Idempotent driver ─────────────────────────────────────────

pub struct GateDriver<A> {
    gate: Gate,
    actuator: A,
    locked: bool,
}

impl<A: GateActuator> GateDriver<A> {
    /// Wrap an actuator and drive it to the locked position.
    pub fn new(gate: Gate, mut actuator: A) -> Self {
        actuator.set_locked(true);
        Self {
            gate,
            actuator,
            locked: true,
        }
    }

    /// Command a position.  Returns `true` if the actuator was driven.
    pub fn set_locked(&mut self, locked: bool) -> bool {
        if self.locked == locked {
            return false;
        }
        debug!("{:?} gate -> {}", self.gate, if locked { "locked" } else { "unlocked" });
        self.actuator.set_locked(locked);
        self.locked = locked;
        true
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}

// ── Servo actuator ────────────────────────────────────────────

const PERIOD_US: u16 = 20_000;
const MIN_PULSE_US: u32 = 500;
const MAX_PULSE_US: u32 = 2500;

pub const LOCKED_ANGLE: u8 = 0;
pub const UNLOCKED_ANGLE: u8 = 180;

/// Servo on any `embedded-hal` PWM channel running at 50 Hz.
pub struct ServoActuator<P> {
    pwm: P,
}

impl<P: SetDutyCycle> ServoActuator<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    /// Pulse width for an angle, clamped to 0–180°.
    pub fn pulse_us(angle: u8) -> u16 {
        let angle = u32::from(angle.min(180));
        (MIN_PULSE_US + (MAX_PULSE_US - MIN_PULSE_US) * angle / 180) as u16
    }

    pub fn set_angle(&mut self, angle: u8) {
        if let Err(e) = self
            .pwm
            .set_duty_cycle_fraction(Self::pulse_us(angle), PERIOD_US)
        {
            warn!("Servo PWM write failed: {:?}", e);
        }
    }

    pub fn into_inner(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> GateActuator for ServoActuator<P> {
    fn set_locked(&mut self, locked: bool) {
        self.set_angle(if locked { LOCKED_ANGLE } else { UNLOCKED_ANGLE });
    }
}
