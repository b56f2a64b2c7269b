//! PetDoor firmware library.
//!
//! Exposes the gate-node control logic and the serial peer protocol for
//! integration testing and for the device binaries. All ESP-IDF-specific
//! code is guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod link;
pub mod node;
pub mod scheduler;
pub mod weather;

// Hardware-facing layers; the device-only pieces are cfg-gated inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
