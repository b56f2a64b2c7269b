//! Gate-node side of the peer link.
//!
//! Requests are written whole; replies are read one byte at a time and fed
//! to the [`FrameDecoder`] until a response of the expected kind arrives.
//! Anything else on the line (stray acks, noise, broken frames) is skipped.
//!
//! By default a `T`/`W` request waits forever: the gate cannot do anything
//! useful without time, and the network node always answers.  Setting
//! `reply_timeout_ms` bounds the wait.

use chrono::NaiveDateTime;
use log::{debug, warn};

use super::codec::{FrameDecoder, Marker};
use super::message::{self, Kind, Notification, Request, Response};
use super::transport::{Transport, WriteError};
use crate::app::ports::{MonotonicClock, NotificationPort, TimeQueryPort, WeatherPort};
use crate::error::LinkError;
use crate::weather::WeatherSnapshot;

pub struct PeerClient<T, C> {
    transport: T,
    decoder: FrameDecoder,
    clock: C,
    reply_timeout_ms: Option<u64>,
}

impl<T: Transport, C: MonotonicClock> PeerClient<T, C> {
    pub fn new(transport: T, clock: C, reply_timeout_ms: Option<u32>) -> Self {
        Self {
            transport,
            decoder: FrameDecoder::new(),
            clock,
            reply_timeout_ms: reply_timeout_ms.map(u64::from),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn send(&mut self, request: &Request<'_>) -> Result<(), LinkError> {
        let frame = message::encode_request(request)?;
        debug!("UART --> {}", frame.as_str());
        self.transport
            .write_all(frame.as_bytes())
            .and_then(|()| self.transport.flush().map_err(WriteError::Transport))
            .map_err(|e| {
                warn!("Peer link write failed: {:?}", e);
                LinkError::Transport
            })
    }

    /// Read until a well-formed response of `kind` arrives.
    ///
    /// A malformed `W` frame is returned as an error so the caller keeps
    /// its cached weather; malformed frames of other kinds are skipped.
    fn await_response(&mut self, kind: Kind) -> Result<Response, LinkError> {
        let start = self.clock.now_ms();
        let mut byte = [0u8; 1];
        loop {
            let n = self.transport.read(&mut byte).map_err(|e| {
                warn!("Peer link read failed: {:?}", e);
                LinkError::Transport
            })?;

            if n == 0 {
                if let Some(limit) = self.reply_timeout_ms {
                    if self.clock.now_ms().saturating_sub(start) >= limit {
                        warn!("No '{}' reply after {} ms", kind.tag(), limit);
                        return Err(LinkError::Timeout);
                    }
                }
                continue;
            }

            let frame = match self.decoder.push(byte[0]) {
                None => continue,
                Some(Err(e)) => {
                    warn!("Peer link frame dropped: {}", e);
                    continue;
                }
                Some(Ok(frame)) => frame,
            };
            if frame.marker != Marker::Response {
                debug!("Ignoring request frame on client side");
                continue;
            }

            let is_expected_kind = frame.payload.first() == Some(&(kind.tag() as u8));
            match message::parse_response(frame.payload) {
                Ok(response) if response.kind() == kind => return Ok(response),
                Ok(other) => debug!("Skipping unrelated {:?} reply", other.kind()),
                Err(e) if is_expected_kind && kind == Kind::Weather => {
                    warn!("Malformed weather reply: {}", e);
                    return Err(e);
                }
                Err(e) => warn!("Skipping malformed reply: {}", e),
            }
        }
    }
}

impl<T: Transport, C: MonotonicClock> TimeQueryPort for PeerClient<T, C> {
    fn request_time(&mut self) -> Result<NaiveDateTime, LinkError> {
        self.send(&Request::Time)?;
        match self.await_response(Kind::Time)? {
            Response::Time(now) => Ok(now),
            _ => Err(LinkError::Malformed("unexpected reply")),
        }
    }
}

impl<T: Transport, C: MonotonicClock> WeatherPort for PeerClient<T, C> {
    fn request_weather(&mut self) -> Result<WeatherSnapshot, LinkError> {
        self.send(&Request::Weather)?;
        match self.await_response(Kind::Weather)? {
            Response::Weather(snapshot) => Ok(snapshot),
            Response::WeatherError => Err(LinkError::Upstream),
            _ => Err(LinkError::Malformed("unexpected reply")),
        }
    }
}

impl<T: Transport, C: MonotonicClock> NotificationPort for PeerClient<T, C> {
    /// Fire and forget: the `!N;` ack is never awaited.
    fn notify(&mut self, notification: &Notification<'_>) -> Result<(), LinkError> {
        self.send(&Request::Notify(*notification))
    }
}
