//! Typed peer-link messages and their ASCII payload encoding.
//!
//! | Kind | Request             | Response                          |
//! |------|---------------------|-----------------------------------|
//! | `T`  | `?T;`               | `!T:YYYY-MM-DD HH:MM:SS;`         |
//! | `W`  | `?W;`               | `!W:cond^sunrise^sunset;` / `!W:E;` |
//! | `N`  | `?N:title^body^tags;` | `!N;` (never awaited)           |

use core::fmt::Write;

use chrono::NaiveDateTime;

use super::codec::{ARG_SEPARATOR, KIND_SEPARATOR, MAX_FRAME_LEN, Marker, TERMINATOR};
use crate::error::LinkError;
use crate::weather::{Condition, WeatherSnapshot};

/// Wire datetime format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error marker carried in a `W` response.
pub const WEATHER_ERROR: &str = "E";

/// Encoded frame including marker and terminator.
pub type FrameBuf = heapless::String<{ MAX_FRAME_LEN + 2 }>;

// ═══════════════════════════════════════════════════════════════
//  Message types
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Time,
    Weather,
    Notify,
}

impl Kind {
    pub fn tag(self) -> char {
        match self {
            Self::Time => 'T',
            Self::Weather => 'W',
            Self::Notify => 'N',
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "T" => Some(Self::Time),
            "W" => Some(Self::Weather),
            "N" => Some(Self::Notify),
            _ => None,
        }
    }
}

/// Push notification forwarded to the owner's phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification<'a> {
    pub title: &'a str,
    pub body: &'a str,
    /// Comma-separated emoji tags, may be empty.
    pub tags: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    Time,
    Weather,
    Notify(Notification<'a>),
}

impl Request<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Time => Kind::Time,
            Self::Weather => Kind::Weather,
            Self::Notify(_) => Kind::Notify,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Time(NaiveDateTime),
    Weather(WeatherSnapshot),
    /// The network node could not fetch the weather.
    WeatherError,
    NotifyAck,
}

impl Response {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Time(_) => Kind::Time,
            Self::Weather(_) | Self::WeatherError => Kind::Weather,
            Self::NotifyAck => Kind::Notify,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Encoding
// ═══════════════════════════════════════════════════════════════

fn is_reserved(b: u8) -> bool {
    Marker::from_byte(b).is_some() || b == TERMINATOR || b == ARG_SEPARATOR
}

fn check_field(field: &str) -> Result<&str, LinkError> {
    if field.bytes().any(is_reserved) {
        Err(LinkError::InvalidField)
    } else {
        Ok(field)
    }
}

/// Build `<marker><payload>;` where `payload` is written by `body`.
fn frame(
    marker: Marker,
    body: impl FnOnce(&mut heapless::String<MAX_FRAME_LEN>) -> core::fmt::Result,
) -> Result<FrameBuf, LinkError> {
    let mut payload = heapless::String::<MAX_FRAME_LEN>::new();
    body(&mut payload).map_err(|_| LinkError::FrameTooLong)?;

    let mut out = FrameBuf::new();
    let fits = out.push(char::from(marker.byte())).is_ok()
        && out.push_str(&payload).is_ok()
        && out.push(char::from(TERMINATOR)).is_ok();
    if !fits {
        return Err(LinkError::FrameTooLong);
    }
    Ok(out)
}

pub fn encode_request(request: &Request<'_>) -> Result<FrameBuf, LinkError> {
    match request {
        Request::Time | Request::Weather => {
            frame(Marker::Request, |p| p.write_char(request.kind().tag()))
        }
        Request::Notify(n) => {
            let title = check_field(n.title)?;
            let body = check_field(n.body)?;
            let tags = check_field(n.tags)?;
            frame(Marker::Request, |p| write!(p, "N:{title}^{body}^{tags}"))
        }
    }
}

pub fn encode_response(response: &Response) -> Result<FrameBuf, LinkError> {
    frame(Marker::Response, |p| match response {
        Response::Time(dt) => write!(p, "T:{}", dt.format(DATETIME_FORMAT)),
        Response::Weather(w) => write!(
            p,
            "W:{}^{}^{}",
            w.condition,
            w.sunrise.format(DATETIME_FORMAT),
            w.sunset.format(DATETIME_FORMAT)
        ),
        Response::WeatherError => write!(p, "W:{WEATHER_ERROR}"),
        Response::NotifyAck => p.write_char('N'),
    })
}

// ═══════════════════════════════════════════════════════════════
//  Parsing
// ═══════════════════════════════════════════════════════════════

/// Split `KIND[:ARGS]`.
fn split_payload(payload: &[u8]) -> Result<(Kind, Option<&str>), LinkError> {
    let text = core::str::from_utf8(payload).map_err(|_| LinkError::Malformed("not UTF-8"))?;
    let (tag, args) = match text.split_once(char::from(KIND_SEPARATOR)) {
        Some((tag, args)) => (tag, Some(args)),
        None => (text, None),
    };
    let kind = Kind::from_tag(tag).ok_or(LinkError::Malformed("unknown kind"))?;
    Ok((kind, args))
}

/// Parse a wire datetime.  Accepts a `T` separator and ignores fractional
/// seconds.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, LinkError> {
    let s = s.trim();
    let s = s.split_once('.').map_or(s, |(whole, _)| whole);
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| LinkError::Malformed("bad datetime"))
}

/// Parse a request payload (marker and terminator already stripped).
pub fn parse_request(payload: &[u8]) -> Result<Request<'_>, LinkError> {
    match split_payload(payload)? {
        (Kind::Time, None) => Ok(Request::Time),
        (Kind::Weather, None) => Ok(Request::Weather),
        (Kind::Notify, Some(args)) => {
            let mut parts = args.split(char::from(ARG_SEPARATOR));
            let title = parts.next().unwrap_or_default();
            let body = parts.next().ok_or(LinkError::Malformed("notification without body"))?;
            let tags = parts.next().unwrap_or_default();
            if parts.next().is_some() {
                return Err(LinkError::Malformed("too many notification fields"));
            }
            Ok(Request::Notify(Notification { title, body, tags }))
        }
        (Kind::Notify, None) => Err(LinkError::Malformed("notification without fields")),
        (Kind::Time | Kind::Weather, Some(_)) => Err(LinkError::Malformed("unexpected arguments")),
    }
}

/// Parse a response payload (marker and terminator already stripped).
pub fn parse_response(payload: &[u8]) -> Result<Response, LinkError> {
    match split_payload(payload)? {
        (Kind::Time, Some(args)) => Ok(Response::Time(parse_datetime(args)?)),
        (Kind::Weather, Some(WEATHER_ERROR)) => Ok(Response::WeatherError),
        (Kind::Weather, Some(args)) => {
            let mut parts = args.split(char::from(ARG_SEPARATOR));
            let (Some(condition), Some(sunrise), Some(sunset), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(LinkError::Malformed("weather needs three fields"));
            };
            let condition: Condition = condition.parse().unwrap_or(Condition::Unknown);
            Ok(Response::Weather(WeatherSnapshot {
                condition,
                sunrise: parse_datetime(sunrise)?,
                sunset: parse_datetime(sunset)?,
            }))
        }
        (Kind::Notify, _) => Ok(Response::NotifyAck),
        (Kind::Time | Kind::Weather, None) => Err(LinkError::Malformed("missing arguments")),
    }
}
