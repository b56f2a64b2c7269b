//! Actuator drivers: the two gate servos and the indicator strip.
//!
//! Register-level access (PWM peripheral, NeoPixel timing) lives behind
//! the two small traits below; the drivers add the idempotence the
//! controller relies on.

pub mod gate;
pub mod status_led;

/// Indicator colour as (R, G, B), each 0–255.
pub type Rgb = (u8, u8, u8);

/// One physical lock.  No position feedback: commands are assumed to land.
pub trait GateActuator {
    fn set_locked(&mut self, locked: bool);
}

/// An addressable strip filled with a single colour.
pub trait IndicatorStrip {
    fn set_colour(&mut self, colour: Rgb);
}
