//! Serial peer link between the gate node and the network node.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Gate node                           Network node            │
//! │                                                              │
//! │  PeerClient ──?T;  ?W;  ?N:..;──▶  PeerServer                │
//! │      ▲                                 │                     │
//! │      └──────!T:..; !W:..; !N;─────────┘  TimeSource          │
//! │                                          WeatherProvider     │
//! │  Transport (UART, 115200 8N1)            NotificationSink    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Frames are ASCII: a marker (`?` request, `!` response), a one-letter
//! kind, optional `:`-prefixed arguments separated by `^`, and a `;`
//! terminator.  [`codec`] handles byte framing, [`message`] the typed
//! payloads, [`client`] and [`server`] the two ends.

pub mod client;
pub mod codec;
pub mod message;
pub mod server;
pub mod transport;
