//! Integration tests for the AppService → scheduler → FSM → ports pipeline.
//!
//! These run on the host (x86_64) and drive the service tick by tick with
//! scripted badge reads, door samples and peer-link replies.

use crate::mock_hw::{LogSink, MockHardware, MockLink, at, weather};

use petdoor::app::events::AppEvent;
use petdoor::app::ports::AccessOutcome;
use petdoor::app::service::AppService;
use petdoor::config::SystemConfig;
use petdoor::drivers::gate::Gate;
use petdoor::drivers::status_led::{COLOUR_DENIED, COLOUR_GRANTED};
use petdoor::error::{LinkError, SensorError};
use petdoor::fsm::StateId;
use petdoor::fsm::context::DogLocation;
use petdoor::sensors::rfid::CredentialId;
use petdoor::weather::{Condition, WeatherSnapshot};

fn make_app(snapshot: WeatherSnapshot) -> (AppService, MockHardware, MockLink, LogSink) {
    let mut app = AppService::new(SystemConfig::default(), snapshot);
    let mut hw = MockHardware::new();
    let mut link = MockLink::new();
    let mut sink = LogSink::new();
    app.start(&mut hw, &mut link, &mut sink);
    (app, hw, link, sink)
}

// ── Daily weather refresh ────────────────────────────────────

#[test]
fn refresh_after_midnight_happens_exactly_once() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));
    link.weather.push_back(Ok(weather(2, Condition::Rain)));

    app.tick(at(2, 0, 5), &mut hw, &mut link, &mut sink);
    assert_eq!(link.weather_requests, 1);
    assert_eq!(*app.weather(), weather(2, Condition::Rain));
    assert!(sink.events.contains(&AppEvent::WeatherRefreshed {
        condition: Condition::Rain,
        temperature_c: Some(20.0),
    }));

    app.tick(at(2, 0, 6), &mut hw, &mut link, &mut sink);
    app.tick(at(2, 0, 9), &mut hw, &mut link, &mut sink);
    assert_eq!(link.weather_requests, 1);
}

#[test]
fn upstream_error_keeps_snapshot_and_waits_a_day() {
    let boot = weather(1, Condition::Clear);
    let (mut app, mut hw, mut link, mut sink) = make_app(boot);
    link.weather.push_back(Err(LinkError::Upstream));

    app.tick(at(2, 0, 5), &mut hw, &mut link, &mut sink);
    assert_eq!(link.weather_requests, 1);
    assert_eq!(*app.weather(), boot);
    assert!(sink.events.contains(&AppEvent::WeatherStale));

    // Still stale, but the attempt for today is spent.
    app.tick(at(2, 0, 7), &mut hw, &mut link, &mut sink);
    assert_eq!(link.weather_requests, 1);

    app.tick(at(3, 0, 2), &mut hw, &mut link, &mut sink);
    assert_eq!(link.weather_requests, 2);
}

#[test]
fn no_refresh_outside_the_window_or_when_fresh() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));

    app.tick(at(1, 0, 5), &mut hw, &mut link, &mut sink);
    app.tick(at(2, 0, 10), &mut hw, &mut link, &mut sink);
    app.tick(at(2, 12, 0), &mut hw, &mut link, &mut sink);
    assert_eq!(link.weather_requests, 0);
}

// ── Exit notifications ───────────────────────────────────────

#[test]
fn meal_missed_while_inside_notifies_once() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));

    app.tick(at(1, 9, 10), &mut hw, &mut link, &mut sink);
    assert_eq!(app.state(), StateId::Eating);
    assert_eq!(app.visits(), 0);

    app.tick(at(1, 9, 31), &mut hw, &mut link, &mut sink);
    assert_eq!(app.state(), StateId::MustStayOut);
    assert_eq!(link.sent.len(), 1);
    assert_eq!(link.sent[0].title, "It's time to go out");
    assert_eq!(link.sent[0].body, "Food time has ended and dog is still inside");
}

#[test]
fn meal_with_a_visit_sends_nothing() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));
    hw.badges.push_back(AccessOutcome::Authorized);
    hw.door.push_back(true);

    app.tick(at(1, 9, 10), &mut hw, &mut link, &mut sink);
    assert_eq!(app.visits(), 1);
    assert_eq!(app.dog_location(), DogLocation::Outside);
    assert!(sink.events.contains(&AppEvent::DogMoved(DogLocation::Outside)));

    app.tick(at(1, 9, 31), &mut hw, &mut link, &mut sink);
    assert!(link.sent.is_empty());
    assert_eq!(app.visits(), 0, "counter resets on enter");
}

#[test]
fn meal_missed_while_outside_reports_food_missed() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));
    hw.badges.push_back(AccessOutcome::Authorized);
    hw.door.push_back(true);

    app.tick(at(1, 7, 0), &mut hw, &mut link, &mut sink);
    assert_eq!(app.state(), StateId::FreeInOut);
    assert_eq!(app.dog_location(), DogLocation::Outside);

    app.tick(at(1, 9, 10), &mut hw, &mut link, &mut sink);
    app.tick(at(1, 9, 31), &mut hw, &mut link, &mut sink);
    assert_eq!(link.titles(), ["Food time is over"]);
}

// ── Weather gate ─────────────────────────────────────────────

#[test]
fn stay_out_in_rain_keeps_out_gate_locked() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Rain));
    hw.badges.push_back(AccessOutcome::Authorized);
    hw.door.push_back(true);

    app.tick(at(1, 10, 0), &mut hw, &mut link, &mut sink);
    assert_eq!(app.state(), StateId::MustStayOut);
    assert!(!hw.unlocked(Gate::Outward));
    assert!(!hw.unlocked(Gate::Inward));
    assert!(hw.is_locked(Gate::Outward));
    assert_eq!(app.dog_location(), DogLocation::Inside);
    assert_eq!(hw.indicator(), Some(COLOUR_GRANTED));
    // The flap was never sampled.
    assert_eq!(hw.door.len(), 1);
}

#[test]
fn stay_out_in_fair_weather_lets_the_dog_out() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clouds));
    hw.badges.push_back(AccessOutcome::Authorized);
    hw.door.push_back(true);

    app.tick(at(1, 10, 0), &mut hw, &mut link, &mut sink);
    assert!(!hw.is_locked(Gate::Outward));
    assert!(hw.is_locked(Gate::Inward));
    assert_eq!(app.dog_location(), DogLocation::Outside);
    assert_eq!(app.visits(), 1);
}

#[test]
fn dead_thermometer_keeps_out_gate_locked() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));
    hw.temperature = Err(SensorError::ReadFailed);
    hw.badges.push_back(AccessOutcome::Authorized);
    hw.door.push_back(true);

    app.tick(at(1, 10, 0), &mut hw, &mut link, &mut sink);
    assert_eq!(app.state(), StateId::MustStayOut);
    assert_eq!(app.temperature_c(), None);
    assert!(hw.is_locked(Gate::Outward));
    assert!(!hw.unlocked(Gate::Outward));
    assert_eq!(app.dog_location(), DogLocation::Inside);
}

#[test]
fn heat_keeps_out_gate_locked_during_meals() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));
    hw.temperature = Ok(35.0);
    hw.badges.push_back(AccessOutcome::Authorized);

    app.tick(at(1, 13, 10), &mut hw, &mut link, &mut sink);
    assert_eq!(app.state(), StateId::Eating);
    assert!(!hw.is_locked(Gate::Inward));
    assert!(hw.is_locked(Gate::Outward));
}

// ── Night ────────────────────────────────────────────────────

#[test]
fn unknown_badge_notifies_and_shows_red() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));
    hw.badges
        .push_back(AccessOutcome::Denied(CredentialId([1, 2, 3, 4])));

    app.tick(at(1, 3, 0), &mut hw, &mut link, &mut sink);
    assert_eq!(link.titles(), ["Error: unknown ID badge"]);
    assert_eq!(link.sent[0].tags, "x");
    assert_eq!(hw.indicator(), Some(COLOUR_DENIED));
    assert_eq!(app.visits(), 0);
}

#[test]
fn pushing_out_at_night_escalates() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));
    hw.badges.push_back(AccessOutcome::Authorized);
    hw.door.push_back(true);

    app.tick(at(1, 23, 0), &mut hw, &mut link, &mut sink);
    assert_eq!(link.titles(), ["Dog is trying to go out"]);
    assert_eq!(app.dog_location(), DogLocation::Inside);
    assert!(hw.is_locked(Gate::Outward));

    hw.badges.push_back(AccessOutcome::Authorized);
    app.tick(at(1, 23, 1), &mut hw, &mut link, &mut sink);
    assert_eq!(app.visits(), 1);
    assert_eq!(link.sent.len(), 1);
}

// ── Whole day ────────────────────────────────────────────────

#[test]
fn full_day_follows_the_schedule() {
    let (mut app, mut hw, mut link, mut sink) = make_app(weather(1, Condition::Clear));

    let walk = [
        ((3, 0), StateId::MustStayIn),
        ((7, 0), StateId::FreeInOut),
        ((9, 15), StateId::Eating),
        ((11, 0), StateId::MustStayOut),
        ((13, 15), StateId::Eating),
        ((15, 0), StateId::MustStayOut),
        ((19, 0), StateId::FreeInOut),
        ((20, 15), StateId::Eating),
        ((22, 0), StateId::MustStayIn),
    ];
    for ((h, m), expected) in walk {
        app.tick(at(1, h, m), &mut hw, &mut link, &mut sink);
        assert_eq!(app.state(), expected, "at {h:02}:{m:02}");
    }

    assert_eq!(app.tick_count(), 9);
    assert_eq!(sink.state_changes(), 8);
    let bodies: Vec<&str> = link.sent.iter().map(|s| s.body.as_str()).collect();
    assert_eq!(
        bodies,
        [
            "Food time has ended and dog is still inside",
            "Outdoor time has ended and dog is still inside",
            "Food time has ended and dog is still inside",
            "Outdoor time has ended and dog is still inside",
            "Food time has ended and dog is still inside",
        ]
    );
    assert_eq!(link.weather_requests, 0);
    assert!(hw.is_locked(Gate::Inward) && hw.is_locked(Gate::Outward));
}
