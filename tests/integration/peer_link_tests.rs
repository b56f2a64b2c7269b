//! Gate-node client against the network-node server over an in-memory
//! serial line.
//!
//! The client's transport pumps the server whenever the client finds its
//! RX side empty, so a blocking request/reply exchange runs to completion
//! on a single thread.

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::NaiveDateTime;
use petdoor::app::ports::{
    NotificationPort, NotificationSink, TimeQueryPort, TimeSource, WeatherPort, WeatherProvider,
};
use petdoor::config::SystemConfig;
use petdoor::error::LinkError;
use petdoor::fsm::StateId;
use petdoor::fsm::states::{FOOD_MISSED, MEAL_OVER_STILL_INSIDE, OUTDOOR_MISSED};
use petdoor::link::client::PeerClient;
use petdoor::link::message::Notification;
use petdoor::link::server::PeerServer;
use petdoor::link::transport::Transport;
use petdoor::node::GateNode;
use petdoor::weather::{Condition, WeatherSnapshot};

use crate::mock_hw::{LogSink, ManualClock, MockHardware, at, weather};

// ── Serial line ───────────────────────────────────────────────

type Pipe = Rc<RefCell<VecDeque<u8>>>;

/// One end of the line: reads from `rx`, writes to `tx`.
struct LineEnd {
    rx: Pipe,
    tx: Pipe,
}

impl Transport for LineEnd {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut rx = self.rx.borrow_mut();
        let n = buf.len().min(rx.len());
        for slot in &mut buf[..n] {
            *slot = rx.pop_front().ok_or(())?;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.tx.borrow_mut().extend(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

// ── Network node collaborators ────────────────────────────────

struct FixedTime(NaiveDateTime);

impl TimeSource for FixedTime {
    fn now(&mut self) -> NaiveDateTime {
        self.0
    }
}

struct Sky(Option<WeatherSnapshot>);

impl WeatherProvider for Sky {
    fn fetch(&mut self, _latitude: f32, _longitude: f32) -> anyhow::Result<WeatherSnapshot> {
        self.0.ok_or_else(|| anyhow::anyhow!("weather API returned 503"))
    }
}

#[derive(Clone, Default)]
struct Phone(Rc<RefCell<Vec<(String, String, String)>>>);

impl NotificationSink for Phone {
    fn send(&mut self, title: &str, body: &str, tags: &str) -> anyhow::Result<()> {
        self.0
            .borrow_mut()
            .push((title.to_owned(), body.to_owned(), tags.to_owned()));
        Ok(())
    }
}

type Server = PeerServer<LineEnd, FixedTime, Sky, Phone>;

/// Client-side transport that lets the server catch up before reading.
struct Pumped {
    end: LineEnd,
    server: Server,
}

impl Transport for Pumped {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        if self.end.rx.borrow().is_empty() {
            self.server.poll().map_err(|_| ())?;
        }
        self.end.read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.end.write(data)
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

fn line(
    now: NaiveDateTime,
    sky: Option<WeatherSnapshot>,
    phone: Phone,
) -> PeerClient<Pumped, ManualClock> {
    let to_server = Pipe::default();
    let to_client = Pipe::default();
    let server = PeerServer::new(
        LineEnd {
            rx: to_server.clone(),
            tx: to_client.clone(),
        },
        FixedTime(now),
        Sky(sky),
        phone,
        &SystemConfig::default(),
    );
    let end = LineEnd {
        rx: to_client,
        tx: to_server,
    };
    PeerClient::new(Pumped { end, server }, ManualClock::new(), None)
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn time_round_trip() {
    let mut client = line(at(1, 9, 15), None, Phone::default());
    assert_eq!(client.request_time(), Ok(at(1, 9, 15)));
}

#[test]
fn weather_round_trip() {
    let w = weather(1, Condition::Drizzle);
    let mut client = line(at(1, 0, 5), Some(w), Phone::default());
    assert_eq!(client.request_weather(), Ok(w));
}

#[test]
fn upstream_weather_failure_reaches_the_gate() {
    let mut client = line(at(1, 0, 5), None, Phone::default());
    assert_eq!(client.request_weather(), Err(LinkError::Upstream));
}

#[test]
fn notification_is_delivered_and_its_ack_skipped() {
    let phone = Phone::default();
    let mut client = line(at(1, 12, 0), None, phone.clone());
    let n = Notification {
        title: "Food time is over",
        body: "...but dog has not eaten",
        tags: "worried",
    };
    client.notify(&n).unwrap();

    // The stale "!N;" ack sits ahead of the time reply.
    assert_eq!(client.request_time(), Ok(at(1, 12, 0)));
    assert_eq!(
        *phone.0.borrow(),
        [(
            String::from("Food time is over"),
            String::from("...but dog has not eaten"),
            String::from("worried")
        )]
    );
}

#[test]
fn missed_window_notifications_reach_the_phone() {
    let phone = Phone::default();
    let mut client = line(at(1, 21, 0), None, phone.clone());
    for n in [MEAL_OVER_STILL_INSIDE, FOOD_MISSED, OUTDOOR_MISSED] {
        client.notify(&n).unwrap();
    }
    client.request_time().unwrap();

    let bodies: Vec<String> = phone.0.borrow().iter().map(|(_, b, _)| b.clone()).collect();
    assert_eq!(
        bodies,
        [
            "Food time has ended and dog is still inside",
            "...but dog has not eaten",
            "Outdoor time has ended and dog is still inside",
        ]
    );
}

#[test]
fn gate_node_boots_over_the_link() {
    let clock = ManualClock::new();
    let client = line(at(1, 9, 10), Some(weather(1, Condition::Clear)), Phone::default());
    let mut node = GateNode::boot(
        SystemConfig::default(),
        MockHardware::new(),
        client,
        clock,
        LogSink::new(),
    )
    .unwrap();

    assert_eq!(node.app().weather().condition, Condition::Clear);
    node.run_once();
    assert_eq!(node.app().state(), StateId::Eating);
}
