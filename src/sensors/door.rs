//! Flap movement detection.
//!
//! The flex sensor reads a resting value when the flap hangs closed and
//! swings through a middle band while the dog pushes through.  Counting
//! in-band samples over a window (rather than looking for edges) rides
//! out the flap bouncing.

use core::time::Duration;

use log::debug;

use super::PositionSensor;
use crate::app::ports::MonotonicClock;
use crate::config::SystemConfig;

pub struct DoorSensor<S, C> {
    sensor: S,
    clock: C,
    band_low: u16,
    band_high: u16,
    threshold: u32,
}

impl<S: PositionSensor, C: MonotonicClock> DoorSensor<S, C> {
    pub fn new(sensor: S, clock: C, config: &SystemConfig) -> Self {
        Self {
            sensor,
            clock,
            band_low: config.ajar_band_low,
            band_high: config.ajar_band_high,
            threshold: config.ajar_threshold,
        }
    }

    /// Sample for `window`; true if more than `threshold` readings fell
    /// strictly inside the ajar band.
    pub fn sample(&mut self, window: Duration) -> bool {
        let limit = window.as_millis() as u64;
        let start = self.clock.now_ms();
        let mut hits: u32 = 0;
        while self.clock.now_ms().saturating_sub(start) < limit {
            let v = self.sensor.sample();
            if v > self.band_low && v < self.band_high {
                hits = hits.saturating_add(1);
            }
        }
        debug!("Door sample: {hits} in-band readings");
        hits > self.threshold
    }
}
