//! Time-of-day scheduler.
//!
//! Maps the wall-clock time onto the controller state the door should be
//! in, using eight windows anchored to sunrise, sunset and the three meals.
//! It also decides when the once-a-day weather refresh is due.
//!
//! ```text
//!  00:00        sunrise   09:00 09:30     13:00 13:30      sunset   20:00 20:30     24:00
//!    │ MustStayIn  │ Free  │ Eat │ StayOut │ Eat │ StayOut  │ Free  │ Eat │ MustStayIn │
//! ```
//!
//! Windows are half-open `[start, end)`.  A window whose start is after its
//! end wraps past midnight (the night window does).  The first matching
//! window wins; a time no window covers selects nothing, leaving the
//! current state in place.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use log::info;

use crate::config::SystemConfig;
use crate::fsm::StateId;
use crate::weather::WeatherSnapshot;

// ═══════════════════════════════════════════════════════════════
//  Schedule window
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub state: StateId,
}

impl ScheduleWindow {
    /// Check if `time` falls inside the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            // e.g. 09:00..09:30; empty when start == end
            time >= self.start && time < self.end
        } else {
            // e.g. 20:30..06:00 (wraps around midnight)
            time >= self.start || time < self.end
        }
    }
}

pub const WINDOW_COUNT: usize = 8;

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct TimeScheduler {
    breakfast: NaiveTime,
    lunch: NaiveTime,
    dinner: NaiveTime,
    meal: TimeDelta,
    refresh_window: TimeDelta,
    /// Day of the last refresh attempt, successful or not.
    last_refresh_attempt: Option<NaiveDate>,
}

impl TimeScheduler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            breakfast: config.breakfast,
            lunch: config.lunch,
            dinner: config.dinner,
            meal: TimeDelta::minutes(i64::from(config.meal_duration_minutes)),
            refresh_window: TimeDelta::minutes(i64::from(config.weather_refresh_window_minutes)),
            last_refresh_attempt: None,
        }
    }

    /// The day's windows in priority order.
    pub fn windows(&self, sunrise: NaiveTime, sunset: NaiveTime) -> [ScheduleWindow; WINDOW_COUNT] {
        let w = |start, end, state| ScheduleWindow { start, end, state };
        let (b, l, d, m) = (self.breakfast, self.lunch, self.dinner, self.meal);
        [
            w(d + m, sunrise, StateId::MustStayIn),
            w(sunrise, b, StateId::FreeInOut),
            w(b, b + m, StateId::Eating),
            w(b + m, l, StateId::MustStayOut),
            w(l, l + m, StateId::Eating),
            w(l + m, sunset, StateId::MustStayOut),
            w(sunset, d, StateId::FreeInOut),
            w(d, d + m, StateId::Eating),
        ]
    }

    /// State the door should be in at `time`, or `None` in a gap.
    pub fn select(&self, time: NaiveTime, weather: &WeatherSnapshot) -> Option<StateId> {
        self.windows(weather.sunrise.time(), weather.sunset.time())
            .iter()
            .find(|w| w.contains(time))
            .map(|w| w.state)
    }

    /// True once per day, inside the post-midnight window, when the cached
    /// sunrise belongs to an earlier day.  Calling it records the attempt, so
    /// a failed fetch is not retried until the next night.
    pub fn weather_refresh_due(&mut self, now: NaiveDateTime, weather_date: NaiveDate) -> bool {
        let today = now.date();
        let since_midnight = now.time() - NaiveTime::MIN;
        if since_midnight >= self.refresh_window
            || weather_date == today
            || self.last_refresh_attempt == Some(today)
        {
            return false;
        }
        info!("Weather refresh due (cached for {weather_date}, today {today})");
        self.last_refresh_attempt = Some(today);
        true
    }
}
