//! Network-node side of the peer link.
//!
//! A single-threaded dispatcher: each well-formed request frame is routed
//! to one collaborator and answered with exactly one reply frame.
//!
//! ```text
//!   ?T;        ──▶ TimeSource::now        ──▶ !T:<datetime>;
//!   ?W;        ──▶ WeatherProvider::fetch ──▶ !W:<cond>^<rise>^<set>;  or  !W:E;
//!   ?N:t^b^g;  ──▶ NotificationSink::send ──▶ !N;   (failures only logged)
//! ```
//!
//! Malformed requests and response-marked frames get no reply.

use log::{debug, info, warn};

use super::codec::{FrameDecoder, MAX_FRAME_LEN, Marker};
use super::message::{self, Request, Response};
use super::transport::{Transport, WriteError};
use crate::app::ports::{NotificationSink, TimeSource, WeatherProvider};
use crate::config::SystemConfig;
use crate::error::LinkError;

const READ_CHUNK: usize = 64;

pub struct PeerServer<T, TS, WP, NS> {
    transport: T,
    decoder: FrameDecoder,
    time: TS,
    weather: WP,
    notifier: NS,
    latitude: f32,
    longitude: f32,
}

impl<T, TS, WP, NS> PeerServer<T, TS, WP, NS>
where
    T: Transport,
    TS: TimeSource,
    WP: WeatherProvider,
    NS: NotificationSink,
{
    pub fn new(transport: T, time: TS, weather: WP, notifier: NS, config: &SystemConfig) -> Self {
        Self {
            transport,
            decoder: FrameDecoder::new(),
            time,
            weather,
            notifier,
            latitude: config.latitude,
            longitude: config.longitude,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume whatever bytes are available and answer every complete
    /// request among them.  Returns the number of bytes read.
    pub fn poll(&mut self) -> Result<usize, LinkError> {
        let mut chunk = [0u8; READ_CHUNK];
        let n = self.transport.read(&mut chunk).map_err(|e| {
            warn!("Peer link read failed: {:?}", e);
            LinkError::Transport
        })?;

        for &byte in &chunk[..n] {
            let mut payload = heapless::Vec::<u8, MAX_FRAME_LEN>::new();
            match self.decoder.push(byte) {
                None => continue,
                Some(Err(e)) => {
                    warn!("Peer link frame dropped: {}", e);
                    continue;
                }
                Some(Ok(frame)) if frame.marker == Marker::Response => {
                    debug!("Ignoring response frame on server side");
                    continue;
                }
                Some(Ok(frame)) => {
                    if payload.extend_from_slice(frame.payload).is_err() {
                        warn!("Request of {} bytes dropped", frame.payload.len());
                        continue;
                    }
                }
            }
            // A failed reply must not cost the requests queued behind it.
            if let Err(e) = self.handle(&payload) {
                warn!("Reply not sent: {}", e);
            }
        }
        Ok(n)
    }

    /// Poll forever, idling briefly when the line is quiet.
    pub fn serve(&mut self) -> ! {
        info!("Peer server listening");
        loop {
            match self.poll() {
                Ok(0) => std::thread::sleep(core::time::Duration::from_millis(1)),
                Ok(_) => {}
                Err(e) => {
                    warn!("Peer server error: {}", e);
                    self.decoder.reset();
                }
            }
        }
    }

    /// Dispatch one request payload and write its reply.
    fn handle(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        let request = match message::parse_request(payload) {
            Ok(r) => r,
            Err(e) => {
                warn!("Malformed request dropped: {}", e);
                return Ok(());
            }
        };
        debug!("UART <-- {:?}", request.kind());

        let response = match request {
            Request::Time => Response::Time(self.time.now()),
            Request::Weather => match self.weather.fetch(self.latitude, self.longitude) {
                Ok(snapshot) => {
                    info!(
                        "Retrieved new weather data: {}, sunrise: {}, sunset: {}",
                        snapshot.condition, snapshot.sunrise, snapshot.sunset
                    );
                    Response::Weather(snapshot)
                }
                Err(e) => {
                    warn!("Weather fetch failed: {:#}", e);
                    Response::WeatherError
                }
            },
            Request::Notify(n) => {
                if let Err(e) = self.notifier.send(n.title, n.body, n.tags) {
                    warn!("Notification '{}' not delivered: {:#}", n.title, e);
                }
                Response::NotifyAck
            }
        };

        let frame = message::encode_response(&response)?;
        debug!("UART --> {}", frame.as_str());
        self.transport
            .write_all(frame.as_bytes())
            .and_then(|()| self.transport.flush().map_err(WriteError::Transport))
            .map_err(|e| {
                warn!("Peer link write failed: {:?}", e);
                LinkError::Transport
            })
    }
}
