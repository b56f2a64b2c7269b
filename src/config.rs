//! System configuration parameters
//!
//! All tunable parameters for the PetDoor system, for both nodes.
//! Defaults reproduce the deployed door; a JSON document can override any
//! subset of fields via [`SystemConfig::from_json`].

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::weather::Condition;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Access control ---
    /// The single allow-listed RFID tag (8 lowercase hex digits).
    pub allowed_credential: heapless::String<8>,
    /// How long one access poll waits for a tag (milliseconds).
    pub credential_deadline_ms: u32,

    // --- Door sensor ---
    /// Sampling window for door-movement detection (milliseconds).
    pub door_window_ms: u32,
    /// Lower bound (exclusive) of the "ajar" band in raw ADC counts.
    pub ajar_band_low: u16,
    /// Upper bound (exclusive) of the "ajar" band in raw ADC counts.
    pub ajar_band_high: u16,
    /// In-band sample count that must be exceeded to report the door operated.
    pub ajar_threshold: u32,

    // --- Outdoor weather gate ---
    /// Conditions under which the out-door may be unlocked.
    pub outdoor_conditions: heapless::Vec<Condition, 8>,
    /// Exclusive lower temperature bound (Celsius).
    pub min_outdoor_temp_c: f32,
    /// Exclusive upper temperature bound (Celsius).
    pub max_outdoor_temp_c: f32,

    // --- Schedule ---
    pub breakfast: NaiveTime,
    pub lunch: NaiveTime,
    pub dinner: NaiveTime,
    /// Length of each meal window (minutes).
    pub meal_duration_minutes: u16,
    /// Post-midnight window in which the daily weather refresh may run (minutes).
    pub weather_refresh_window_minutes: u16,
    /// Sunrise assumed when no weather has ever been received.
    pub fallback_sunrise: NaiveTime,
    /// Sunset assumed when no weather has ever been received.
    pub fallback_sunset: NaiveTime,

    // --- Peer link ---
    /// Bound on T/W reply waits.  `None` blocks until the peer answers.
    pub reply_timeout_ms: Option<u32>,
    /// UART baud rate shared by both nodes.
    pub uart_baud: u32,

    // --- Network node ---
    /// Location passed to the weather provider.
    pub latitude: f32,
    pub longitude: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut outdoor_conditions = heapless::Vec::new();
        for c in [Condition::Clear, Condition::Clouds, Condition::Drizzle] {
            let _ = outdoor_conditions.push(c);
        }
        let mut allowed_credential = heapless::String::new();
        let _ = allowed_credential.push_str("d951c359");

        Self {
            // Access control
            allowed_credential,
            credential_deadline_ms: 5000,

            // Door sensor
            door_window_ms: 5000,
            ajar_band_low: 600,
            ajar_band_high: 800,
            ajar_threshold: 10,

            // Outdoor gate
            outdoor_conditions,
            min_outdoor_temp_c: 5.0,
            max_outdoor_temp_c: 32.0,

            // Schedule
            breakfast: hm(9, 0),
            lunch: hm(13, 0),
            dinner: hm(20, 0),
            meal_duration_minutes: 30,
            weather_refresh_window_minutes: 10,
            fallback_sunrise: hm(6, 0),
            fallback_sunset: hm(18, 0),

            // Peer link
            reply_timeout_ms: None,
            uart_baud: 115_200,

            // Trento
            latitude: 46.07,
            longitude: 11.12,
        }
    }
}

impl SystemConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    /// Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("invalid JSON document"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the door misbehave rather than
    /// silently clamping them.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_credential.len() != 8
            || !self
                .allowed_credential
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(Error::Config("allowed_credential must be 8 lowercase hex digits"));
        }
        if self.credential_deadline_ms == 0 || self.door_window_ms == 0 {
            return Err(Error::Config("polling windows must be non-zero"));
        }
        if self.ajar_band_low >= self.ajar_band_high {
            return Err(Error::Config("ajar band is empty"));
        }
        if self.min_outdoor_temp_c >= self.max_outdoor_temp_c {
            return Err(Error::Config("outdoor temperature range is empty"));
        }
        if self.meal_duration_minutes == 0 || self.meal_duration_minutes >= 24 * 60 {
            return Err(Error::Config("meal_duration_minutes out of range"));
        }
        if !(self.breakfast < self.lunch && self.lunch < self.dinner) {
            return Err(Error::Config("meals must be ordered breakfast < lunch < dinner"));
        }
        if self.weather_refresh_window_minutes == 0 {
            return Err(Error::Config("weather refresh window must be non-zero"));
        }
        if self.uart_baud == 0 {
            return Err(Error::Config("uart_baud must be non-zero"));
        }
        Ok(())
    }
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or(NaiveTime::MIN)
}
