//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the pet door: schedule
//! driven FSM orchestration and the daily weather refresh.  All
//! interaction with hardware and the peer link happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod events;
pub mod ports;
pub mod service;
