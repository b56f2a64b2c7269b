//! Unified error types for the PetDoor firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be passed through the FSM and the peer link without allocation.
//!
//! None of these are fatal: the control loop always continues to the next
//! tick.  Access/door timeouts are not errors at all (see
//! [`AccessOutcome`](crate::app::ports::AccessOutcome)).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial peer link failed or produced unusable data.
    Link(LinkError),
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Peer link errors
// ---------------------------------------------------------------------------

/// Byte-level framing failures.  The offending frame is always dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The frame grew past the accumulation buffer before its terminator.
    Overflow,
    /// A new start marker arrived before the open frame was terminated.
    Interrupted,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => write!(f, "frame exceeds maximum length"),
            Self::Interrupted => write!(f, "frame interrupted by new start marker"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The underlying byte channel reported an I/O error.
    Transport,
    /// A complete frame could not be parsed.
    Malformed(&'static str),
    /// An outgoing field contains a structural byte (`? ! ; ^`).
    InvalidField,
    /// An outgoing frame does not fit the maximum frame length.
    FrameTooLong,
    /// The network node reported an upstream failure (`!W:E;`).
    Upstream,
    /// The opt-in reply timeout elapsed.
    Timeout,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport I/O failed"),
            Self::Malformed(what) => write!(f, "malformed frame: {what}"),
            Self::InvalidField => write!(f, "field contains a reserved byte"),
            Self::FrameTooLong => write!(f, "frame too long"),
            Self::Upstream => write!(f, "peer reported an upstream error"),
            Self::Timeout => write!(f, "timed out waiting for reply"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The bus transaction failed or timed out.
    ReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
