//! Marker/terminator frame codec.
//!
//! Wire format:
//! ```text
//! ┌────────┬──────┬──────────────────────────┬────┐
//! │ ? or ! │ KIND │ [:ARG0^ARG1^...]          │ ;  │
//! └────────┴──────┴──────────────────────────┴────┘
//! ```
//!
//! The decoder is fed one byte at a time (the UART is read byte-wise on
//! the gate node) and yields a frame when the terminator arrives.  Markers
//! and terminator are not part of the payload.  Bytes outside an open
//! frame are line noise and are dropped.

use crate::error::FrameError;

/// Maximum frame payload size (protects against a peer that never
/// terminates).
pub const MAX_FRAME_LEN: usize = 192;

pub const REQUEST_MARKER: u8 = b'?';
pub const RESPONSE_MARKER: u8 = b'!';
pub const TERMINATOR: u8 = b';';
pub const ARG_SEPARATOR: u8 = b'^';
pub const KIND_SEPARATOR: u8 = b':';

/// Which side sent the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Request,
    Response,
}

impl Marker {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            REQUEST_MARKER => Some(Self::Request),
            RESPONSE_MARKER => Some(Self::Response),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            Self::Request => REQUEST_MARKER,
            Self::Response => RESPONSE_MARKER,
        }
    }
}

/// A complete frame borrowed from the decoder buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame<'a> {
    pub marker: Marker,
    pub payload: &'a [u8],
}

/// Streaming frame decoder.
pub struct FrameDecoder {
    buf: heapless::Vec<u8, MAX_FRAME_LEN>,
    /// Marker of the frame being accumulated, `None` between frames.
    open: Option<Marker>,
    /// The buffer still holds the last yielded frame.
    yielded: bool,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            open: None,
            yielded: false,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some(Ok(frame))` on a terminator, `Some(Err(_))` when the
    /// open frame had to be dropped, and `None` otherwise.  The returned
    /// frame is valid until the next call to `push`.
    pub fn push(&mut self, byte: u8) -> Option<Result<RawFrame<'_>, FrameError>> {
        if self.yielded {
            self.buf.clear();
            self.yielded = false;
        }

        if let Some(marker) = Marker::from_byte(byte) {
            let interrupted = self.open.is_some();
            self.buf.clear();
            self.open = Some(marker);
            return interrupted.then_some(Err(FrameError::Interrupted));
        }

        let marker = self.open?;

        if byte == TERMINATOR {
            self.open = None;
            self.yielded = true;
            return Some(Ok(RawFrame {
                marker,
                payload: &self.buf,
            }));
        }

        if self.buf.push(byte).is_err() {
            // Drop the frame; the rest of it is discarded as noise.
            self.buf.clear();
            self.open = None;
            return Some(Err(FrameError::Overflow));
        }
        None
    }

    /// True while a frame is being accumulated.
    pub fn in_frame(&self) -> bool {
        self.open.is_some()
    }

    /// Reset decoder state (e.g. after a transport error).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.open = None;
        self.yielded = false;
    }
}
