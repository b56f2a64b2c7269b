//! ESP32 time adapters.
//!
//! - [`Esp32TimeAdapter`] is the monotonic millisecond clock behind every
//!   bounded poll.  On `target_os = "espidf"` it wraps
//!   `esp_timer_get_time()`; elsewhere it uses `std::time::Instant` for
//!   host-side testing and simulation.
//! - [`WallClock`] turns that counter into local date/time, anchored once
//!   at boot from the network node's `T` reply.  The gate node has no RTC.

use chrono::{NaiveDateTime, TimeDelta};

use crate::app::ports::MonotonicClock;

/// Monotonic time adapter for the ESP32 platform.
#[derive(Debug, Clone, Copy)]
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl MonotonicClock for Esp32TimeAdapter {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }
}

// ───────────────────────────────────────────────────────────────
// Wall clock
// ───────────────────────────────────────────────────────────────

/// Local date/time derived from a boot-time anchor plus monotonic uptime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    base: NaiveDateTime,
    base_ms: u64,
}

impl WallClock {
    /// Pin `base` (the network node's answer) to the current uptime.
    pub fn anchor(base: NaiveDateTime, clock: &impl MonotonicClock) -> Self {
        Self {
            base,
            base_ms: clock.now_ms(),
        }
    }

    pub fn now(&self, clock: &impl MonotonicClock) -> NaiveDateTime {
        let elapsed = clock.now_ms().saturating_sub(self.base_ms);
        let delta = i64::try_from(elapsed)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX);
        self.base.checked_add_signed(delta).unwrap_or(NaiveDateTime::MAX)
    }
}
