//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  StateTable                                               │
//! │  ┌─────────────┬───────────┬───────────┬───────────────┐  │
//! │  │ StateId     │ on_enter  │ on_exit   │ on_update     │  │
//! │  ├─────────────┼───────────┼───────────┼───────────────┤  │
//! │  │ MustStayIn  │ fn(ctx,io)│ -         │ fn(ctx,io)    │  │
//! │  │ FreeInOut   │ fn(ctx,io)│ -         │ fn(ctx,io)    │  │
//! │  │ Eating      │ fn(ctx,io)│ fn(ctx,io)│ fn(ctx,io)    │  │
//! │  │ MustStayOut │ fn(ctx,io)│ fn(ctx,io)│ fn(ctx,io)    │  │
//! │  └─────────────┴───────────┴───────────┴───────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a self-driving FSM, the next state is chosen from outside by the
//! time schedule.  Each tick the service calls [`Fsm::transition_to`] with
//! the scheduled state (a no-op when it is already current), then
//! [`Fsm::update`].  A transition runs `on_exit` for the old state, moves
//! the pointer, resets the visit session and runs `on_enter` for the new
//! one.  Handlers receive `&mut FsmContext` plus a [`GateIo`] carrying the
//! hardware and notification ports.

pub mod context;
pub mod states;

use context::{FsmContext, GateIo};
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all controller states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    MustStayIn = 0,
    FreeInOut = 1,
    Eating = 2,
    MustStayOut = 3,
}

impl StateId {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 4;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature shared by `on_enter`, `on_exit` and `on_update`.
pub type StateActionFn = fn(&mut FsmContext, &mut GateIo<'_>);

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateActionFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `update()`.
    pub fn start(&mut self, ctx: &mut FsmContext, io: &mut GateIo<'_>) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        self.enter_current(ctx, io);
    }

    /// Move to `next` if it differs from the current state.
    ///
    /// Returns `true` if a transition happened.  Re-selecting the current
    /// state never runs `on_exit` or `on_enter`.
    pub fn transition_to(
        &mut self,
        next: StateId,
        ctx: &mut FsmContext,
        io: &mut GateIo<'_>,
    ) -> bool {
        let next_idx = next as usize;
        if next_idx == self.current {
            return false;
        }

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx, io);
        }

        self.current = next_idx;
        self.enter_current(ctx, io);
        true
    }

    /// Run the current state's `on_update` once.
    pub fn update(&self, ctx: &mut FsmContext, io: &mut GateIo<'_>) {
        (self.table[self.current].on_update)(ctx, io);
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        self.table[self.current].id
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn enter_current(&mut self, ctx: &mut FsmContext, io: &mut GateIo<'_>) {
        ctx.session = context::StateSession::default();
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx, io);
        }
    }
}

// ---------------------------------------------------------------------------
// Scripted hardware for handler tests
// ---------------------------------------------------------------------------
