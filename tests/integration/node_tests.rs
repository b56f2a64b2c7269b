//! Boot sequence and wall-clock driven ticking of the gate node.

use crate::mock_hw::{LogSink, ManualClock, MockHardware, MockLink, at, weather};

use chrono::NaiveTime;
use petdoor::app::events::AppEvent;
use petdoor::config::SystemConfig;
use petdoor::error::{Error, LinkError};
use petdoor::fsm::StateId;
use petdoor::node::GateNode;
use petdoor::weather::Condition;

type Node = GateNode<MockHardware, MockLink, ManualClock, LogSink>;

fn boot(link: MockLink, clock: &ManualClock) -> Node {
    GateNode::boot(
        SystemConfig::default(),
        MockHardware::new(),
        link,
        clock.clone(),
        LogSink::new(),
    )
    .unwrap()
}

#[test]
fn boot_retries_time_until_answered() {
    let mut link = MockLink::new();
    link.time.push_back(Err(LinkError::Timeout));
    link.time.push_back(Err(LinkError::Transport));
    link.time.push_back(Ok(at(1, 9, 10)));
    link.weather.push_back(Ok(weather(1, Condition::Clear)));

    let node = boot(link, &ManualClock::new());
    assert_eq!(node.link().time_requests, 3);
    assert_eq!(node.link().weather_requests, 1);
    assert_eq!(node.app().state(), StateId::MustStayIn);
    assert_eq!(node.sink().events, [AppEvent::Started(StateId::MustStayIn)]);
}

#[test]
fn boot_weather_failure_uses_stale_fallback() {
    let mut link = MockLink::new();
    link.time.push_back(Ok(at(2, 14, 0)));

    let node = boot(link, &ManualClock::new());
    let w = node.app().weather();
    assert_eq!(w.condition, Condition::Unknown);
    assert_eq!(w.sunrise, at(1, 6, 0));
    assert_eq!(w.sunset, at(1, 18, 0));
}

#[test]
fn invalid_config_is_rejected() {
    let config = SystemConfig {
        door_window_ms: 0,
        ..SystemConfig::default()
    };
    let result = GateNode::boot(
        config,
        MockHardware::new(),
        MockLink::new(),
        ManualClock::new(),
        LogSink::new(),
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn ticks_follow_the_wall_clock() {
    let clock = ManualClock::new();
    let mut link = MockLink::new();
    link.time.push_back(Ok(at(1, 9, 10)));
    link.weather.push_back(Ok(weather(1, Condition::Clear)));
    let mut node = boot(link, &clock);

    node.run_once();
    assert_eq!(node.app().state(), StateId::Eating);

    clock.advance_minutes(25);
    node.run_once();
    assert_eq!(node.app().state(), StateId::MustStayOut);
    assert_eq!(node.link().sent.len(), 1);
}

#[test]
fn first_night_after_boot_refreshes_weather() {
    let clock = ManualClock::new();
    let mut link = MockLink::new();
    link.time.push_back(Ok(at(1, 23, 58)));
    link.weather.push_back(Ok(weather(1, Condition::Clear)));
    link.weather.push_back(Ok(weather(2, Condition::Snow)));
    let mut node = boot(link, &clock);

    node.run_once();
    assert_eq!(node.link().weather_requests, 1);

    clock.advance_minutes(7);
    node.run_once();
    assert_eq!(node.link().weather_requests, 2);
    assert_eq!(node.app().weather().condition, Condition::Snow);
    assert_eq!(
        node.app().weather().sunrise.time(),
        NaiveTime::from_hms_opt(6, 0, 0).unwrap()
    );
}
