//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers: no closures, no
//! dynamic dispatch for the states themselves, no heap.
//!
//! ```text
//!  enter   both gates locked, resting colour
//!  update  poll RFID ─┬─ authorised ─▶ unlock per policy ─▶ sample door
//!                     ├─ denied ─────▶ notify "unknown badge", red
//!                     └─ timeout ────▶ both gates locked, resting colour
//!  exit    missed-window notification (Eating, MustStayOut)
//! ```
//!
//! | State       | in-gate on auth | out-gate on auth  | door sample               |
//! |-------------|-----------------|-------------------|---------------------------|
//! | MustStayIn  | unlock          | locked            | opened ⇒ escalate         |
//! | FreeInOut   | unlock          | unlock            | opened ⇒ toggle + count   |
//! | Eating      | unlock          | if weather ok     | opened ⇒ toggle + count   |
//! | MustStayOut | unchanged       | if weather ok     | only if out-gate opened   |
//!
//! Transitions are decided by the schedule, never by the handlers.

use super::context::{DogLocation, FsmContext, GateIo};
use super::{StateDescriptor, StateId};
use crate::app::ports::AccessOutcome;
use crate::drivers::Rgb;
use crate::drivers::gate::Gate;
use crate::drivers::status_led::{
    COLOUR_DENIED, COLOUR_EATING, COLOUR_FREE, COLOUR_GRANTED, COLOUR_STAY_IN, COLOUR_STAY_OUT,
};
use crate::link::message::Notification;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Notifications
// ═══════════════════════════════════════════════════════════════════════════

pub const UNKNOWN_BADGE: Notification<'static> = Notification {
    title: "Error: unknown ID badge",
    body: "An unknown ID badge has been scanned",
    tags: "x",
};

pub const TRYING_TO_GO_OUT: Notification<'static> = Notification {
    title: "Dog is trying to go out",
    body: "It's dark outside, the dog should stay in",
    tags: "first_quarter_moon_with_face",
};

pub const MEAL_OVER_STILL_INSIDE: Notification<'static> = Notification {
    title: "It's time to go out",
    body: "Food time has ended and dog is still inside",
    tags: "alarm_clock",
};

pub const FOOD_MISSED: Notification<'static> = Notification {
    title: "Food time is over",
    body: "...but dog has not eaten",
    tags: "worried",
};

pub const OUTDOOR_MISSED: Notification<'static> = Notification {
    title: "It's time to go out",
    body: "Outdoor time has ended and dog is still inside",
    tags: "alarm_clock",
};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: MustStayIn
        StateDescriptor {
            id: StateId::MustStayIn,
            name: "MustStayIn",
            on_enter: Some(must_stay_in_enter),
            on_exit: None,
            on_update: must_stay_in_update,
        },
        // Index 1: FreeInOut
        StateDescriptor {
            id: StateId::FreeInOut,
            name: "FreeInOut",
            on_enter: Some(free_in_out_enter),
            on_exit: None,
            on_update: free_in_out_update,
        },
        // Index 2: Eating
        StateDescriptor {
            id: StateId::Eating,
            name: "Eating",
            on_enter: Some(eating_enter),
            on_exit: Some(eating_exit),
            on_update: eating_update,
        },
        // Index 3: MustStayOut
        StateDescriptor {
            id: StateId::MustStayOut,
            name: "MustStayOut",
            on_enter: Some(must_stay_out_enter),
            on_exit: Some(must_stay_out_exit),
            on_update: must_stay_out_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Baseline for every state: both gates locked, resting colour shown.
fn lock_down(io: &mut GateIo<'_>, colour: Rgb) {
    io.hw.lock(Gate::Inward, true);
    io.hw.lock(Gate::Outward, true);
    io.hw.set_indicator(colour);
}

fn handle_denied(io: &mut GateIo<'_>, outcome: AccessOutcome) {
    if let AccessOutcome::Denied(id) = outcome {
        info!("Unknown ID badge {id} scanned");
    }
    io.notify(&UNKNOWN_BADGE);
    io.hw.set_indicator(COLOUR_DENIED);
}

/// Sample the flap and, if it moved, flip the dog's side and count it.
fn sense_crossing(ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    debug!("Sensing door...");
    if io.hw.door_operated(ctx.door_window()) {
        ctx.dog_location = ctx.dog_location.toggled();
        ctx.session.record_visit();
        info!("Door opened, dog now {:?}", ctx.dog_location);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  MUST STAY IN (night): the dog may come in but not go out
// ═══════════════════════════════════════════════════════════════════════════

fn must_stay_in_enter(_ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    lock_down(io, COLOUR_STAY_IN);
    info!("MUST STAY IN: gates locked");
}

fn must_stay_in_update(ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    match io.hw.poll_credential(ctx.credential_deadline()) {
        AccessOutcome::Authorized => {
            io.hw.set_indicator(COLOUR_GRANTED);
            io.hw.lock(Gate::Inward, false);

            if io.hw.door_operated(ctx.door_window()) {
                // Flap moved while only the in-gate is open: the dog is
                // pushing the wrong way.
                io.notify(&TRYING_TO_GO_OUT);
            } else {
                ctx.dog_location = DogLocation::Inside;
                ctx.session.record_visit();
            }
        }
        denied @ AccessOutcome::Denied(_) => handle_denied(io, denied),
        AccessOutcome::Timeout => lock_down(io, COLOUR_STAY_IN),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  FREE IN/OUT (dawn and evening): either direction
// ═══════════════════════════════════════════════════════════════════════════

fn free_in_out_enter(_ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    lock_down(io, COLOUR_FREE);
    info!("FREE IN/OUT: gates locked until badge");
}

fn free_in_out_update(ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    match io.hw.poll_credential(ctx.credential_deadline()) {
        AccessOutcome::Authorized => {
            io.hw.set_indicator(COLOUR_GRANTED);
            io.hw.lock(Gate::Inward, false);
            io.hw.lock(Gate::Outward, false);
            sense_crossing(ctx, io);
        }
        denied @ AccessOutcome::Denied(_) => handle_denied(io, denied),
        AccessOutcome::Timeout => lock_down(io, COLOUR_FREE),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  EATING (meal windows): come in to eat, out only in fair weather
// ═══════════════════════════════════════════════════════════════════════════

fn eating_enter(_ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    lock_down(io, COLOUR_EATING);
    info!("EATING: gates locked until badge");
}

fn eating_update(ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    match io.hw.poll_credential(ctx.credential_deadline()) {
        AccessOutcome::Authorized => {
            io.hw.set_indicator(COLOUR_GRANTED);
            io.hw.lock(Gate::Inward, false);
            if ctx.outdoor_weather_ok() {
                info!("Weather OK, dog can go out");
                io.hw.lock(Gate::Outward, false);
            }
            sense_crossing(ctx, io);
        }
        denied @ AccessOutcome::Denied(_) => handle_denied(io, denied),
        AccessOutcome::Timeout => lock_down(io, COLOUR_EATING),
    }
}

fn eating_exit(ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    if ctx.session.visits > 0 {
        return;
    }
    match ctx.dog_location {
        DogLocation::Inside => io.notify(&MEAL_OVER_STILL_INSIDE),
        DogLocation::Outside => io.notify(&FOOD_MISSED),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  MUST STAY OUT (daytime): the dog should be outside
// ═══════════════════════════════════════════════════════════════════════════

fn must_stay_out_enter(_ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    lock_down(io, COLOUR_STAY_OUT);
    info!("MUST STAY OUT: gates locked");
}

fn must_stay_out_update(ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    match io.hw.poll_credential(ctx.credential_deadline()) {
        AccessOutcome::Authorized => {
            io.hw.set_indicator(COLOUR_GRANTED);
            if ctx.outdoor_weather_ok() {
                info!("Weather OK, dog can go out");
                io.hw.lock(Gate::Outward, false);
                sense_crossing(ctx, io);
            } else {
                info!("Weather not suitable, out-gate stays locked");
            }
        }
        denied @ AccessOutcome::Denied(_) => handle_denied(io, denied),
        AccessOutcome::Timeout => lock_down(io, COLOUR_STAY_OUT),
    }
}

fn must_stay_out_exit(ctx: &mut FsmContext, io: &mut GateIo<'_>) {
    if ctx.session.visits == 0 && ctx.dog_location == DogLocation::Inside {
        io.notify(&OUTDOOR_MISSED);
    }
}
