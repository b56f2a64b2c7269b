//! RFID access gate.
//!
//! Polls the reader until a badge shows up or the deadline passes, then
//! compares the badge against the single allow-listed UID.

use core::fmt;
use core::time::Duration;

use log::debug;

use super::CredentialReader;
use crate::app::ports::{AccessOutcome, MonotonicClock};

/// 4-byte MIFARE UID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(pub [u8; 4]);

impl CredentialId {
    /// Parse 8 hex digits (either case).
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 8 {
            return None;
        }
        let mut out = [0u8; 4];
        for (i, pair) in bytes.chunks_exact(2).enumerate() {
            let hi = hex_val(pair[0])?;
            let lo = hex_val(pair[1])?;
            out[i] = (hi << 4) | lo;
        }
        Some(Self(out))
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

pub struct AccessGate<R, C> {
    reader: R,
    clock: C,
    allowed: CredentialId,
}

impl<R: CredentialReader, C: MonotonicClock> AccessGate<R, C> {
    pub fn new(reader: R, clock: C, allowed: CredentialId) -> Self {
        Self {
            reader,
            clock,
            allowed,
        }
    }

    /// Busy-poll the reader for up to `deadline`.
    pub fn poll(&mut self, deadline: Duration) -> AccessOutcome {
        let limit = deadline.as_millis() as u64;
        let start = self.clock.now_ms();
        loop {
            if let Some(id) = self.reader.poll() {
                debug!("Badge read: {id}");
                return if id == self.allowed {
                    AccessOutcome::Authorized
                } else {
                    AccessOutcome::Denied(id)
                };
            }
            if self.clock.now_ms().saturating_sub(start) >= limit {
                return AccessOutcome::Timeout;
            }
        }
    }
}
