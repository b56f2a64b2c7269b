//! Weather snapshot cached by the gate node.
//!
//! The network node fetches current conditions plus today's sunrise and
//! sunset; the gate keeps the last good snapshot in its FSM context and
//! uses it for two things: anchoring the schedule windows and gating the
//! out-door on "nice enough to go out".

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Weather condition group, as reported in OpenWeatherMap's `main` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Clear,
    Clouds,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    /// Anything the gate does not recognise.  Never passes the outdoor check.
    Unknown,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Mist => "Mist",
            Self::Smoke => "Smoke",
            Self::Haze => "Haze",
            Self::Dust => "Dust",
            Self::Fog => "Fog",
            Self::Sand => "Sand",
            Self::Ash => "Ash",
            Self::Squall => "Squall",
            Self::Tornado => "Tornado",
            Self::Unknown => "Unknown",
        }
    }
}

impl FromStr for Condition {
    type Err = core::convert::Infallible;

    /// Parsing never fails: unrecognised names map to [`Condition::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Thunderstorm" => Self::Thunderstorm,
            "Drizzle" => Self::Drizzle,
            "Rain" => Self::Rain,
            "Snow" => Self::Snow,
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Mist" => Self::Mist,
            "Smoke" => Self::Smoke,
            "Haze" => Self::Haze,
            "Dust" => Self::Dust,
            "Fog" => Self::Fog,
            "Sand" => Self::Sand,
            "Ash" => Self::Ash,
            "Squall" => Self::Squall,
            "Tornado" => Self::Tornado,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known weather, sunrise and sunset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub condition: Condition,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
}

impl WeatherSnapshot {
    /// Placeholder used when the boot-time fetch fails.
    ///
    /// Dated the day before `today` so the next refresh window treats it as
    /// stale, and with an `Unknown` condition so the out-door stays shut.
    pub fn fallback(today: NaiveDate, sunrise: NaiveTime, sunset: NaiveTime) -> Self {
        let day = today - TimeDelta::days(1);
        Self {
            condition: Condition::Unknown,
            sunrise: day.and_time(sunrise),
            sunset: day.and_time(sunset),
        }
    }

    /// Calendar date the sunrise/sunset pair belongs to.
    pub fn date(&self) -> NaiveDate {
        self.sunrise.date()
    }
}
