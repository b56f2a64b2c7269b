//! Indicator strip driver.
//!
//! The whole strip shows one colour.  Each controller state has a resting
//! colour; badge results flash green or red until the next poll settles.
//! Writes of the colour already shown are skipped.

use super::{IndicatorStrip, Rgb};

pub const COLOUR_STAY_IN: Rgb = (255, 255, 255);
pub const COLOUR_FREE: Rgb = (0, 0, 255);
pub const COLOUR_EATING: Rgb = (253, 112, 57);
pub const COLOUR_STAY_OUT: Rgb = (255, 0, 255);
pub const COLOUR_GRANTED: Rgb = (0, 255, 0);
pub const COLOUR_DENIED: Rgb = (255, 0, 0);

pub struct StatusLed<S> {
    strip: S,
    current: Option<Rgb>,
}

impl<S: IndicatorStrip> StatusLed<S> {
    pub fn new(strip: S) -> Self {
        Self {
            strip,
            current: None,
        }
    }

    pub fn set_colour(&mut self, colour: Rgb) {
        if self.current == Some(colour) {
            return;
        }
        self.strip.set_colour(colour);
        self.current = Some(colour);
    }

    pub fn current_colour(&self) -> Option<Rgb> {
        self.current
    }
}
