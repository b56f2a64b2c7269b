//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                   |
//! |------------|---------------------|-------------------------------|
//! | `hardware` | AccessPort          | RFID reader                   |
//! |            | DoorSensorPort      | Flex sensor ADC               |
//! |            | ActuatorPort        | Gate servos, NeoPixel strip   |
//! |            | TemperaturePort     | Thermometer                   |
//! | `log_sink` | EventSink           | Serial log output             |
//! | `time`     | MonotonicClock      | ESP32 system timer            |
//! | `uart`     | Transport           | ESP-IDF UART driver           |

pub mod hardware;
pub mod log_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
