//! Tablefsm: a table-driven finite state machine engine
//!
//! A state machine is described by three caller-owned tables: the states,
//! the normalized events, and one transition row per state holding a
//! `(event, handler, next_state)` tuple for every event. The tables are
//! validated once when the machine is created, then the machine is driven
//! one event at a time.
//!
//! # Core Concepts
//!
//! - **Normalized ids**: states and events are dense integers `0, 1, 2, ...`
//!   that index the tables directly
//! - **Handlers**: synchronous callbacks returning a [`HandlerOutcome`]
//! - **Quiet events**: tuples without a handler; recorded, never applied
//! - **Exception transitions**: a handler may override the table's next state
//! - **History**: a ring of the last 64 processed events for diagnostics
//!
//! # Example
//!
//! ```rust
//! use tablefsm::core::{HandlerOutcome, StateRow, TransitionTuple};
//! use tablefsm::{event_ids, state_ids, MachineBuilder};
//!
//! state_ids! {
//!     enum Door {
//!         Closed => "Closed",
//!         Open => "Open",
//!     }
//! }
//!
//! event_ids! {
//!     enum Action {
//!         Push => "Push",
//!         Pull => "Pull",
//!     }
//! }
//!
//! fn swing(_: &(), swings: &mut u32) -> HandlerOutcome {
//!     *swings += 1;
//!     HandlerOutcome::ok()
//! }
//!
//! let states = Door::descriptions();
//! let events = Action::descriptions();
//! let rows = vec![
//!     StateRow::new(Door::Closed, vec![
//!         TransitionTuple::new(Action::Push, swing, Door::Open),
//!         TransitionTuple::quiet(Action::Pull, Door::Closed),
//!     ]),
//!     StateRow::new(Door::Open, vec![
//!         TransitionTuple::quiet(Action::Push, Door::Open),
//!         TransitionTuple::new(Action::Pull, swing, Door::Closed),
//!     ]),
//! ];
//!
//! let mut door = MachineBuilder::new()
//!     .name("door")
//!     .initial(Door::Closed)
//!     .states(&states)
//!     .events(&events)
//!     .table(&rows)
//!     .build()
//!     .unwrap();
//!
//! let mut swings = 0;
//! door.process_event(Action::Push, &(), &mut swings).unwrap();
//! assert_eq!(door.current_state(), Door::Open.id());
//!
//! door.process_event(Action::Push, &(), &mut swings).unwrap();
//! assert_eq!(door.current_state(), Door::Open.id());
//! assert_eq!(swings, 1);
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod introspect;
pub mod registry;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use crate::core::{EventId, HandlerOutcome, StateId, Transition};
pub use engine::{Dispatch, FsmError, Machine};
pub use registry::{MachineHandle, MachineRegistry};
