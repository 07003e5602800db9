//! Runtime errors reported by the engine and the registry.

use crate::core::{EventId, HandlerError, StateId};
use thiserror::Error;

/// Errors that can occur while driving a state machine.
///
/// None of these change the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("No state machine handle supplied")]
    NullHandle,

    #[error("State machine handle is stale or does not belong to this registry")]
    InvalidHandle,

    #[error("Event {event} is out of range, the table defines {number_events} events")]
    InvalidEvent { event: EventId, number_events: usize },

    #[error("Next state {state} is out of range, the table defines {number_states} states")]
    InvalidState { state: StateId, number_states: usize },

    #[error(transparent)]
    Handler(#[from] HandlerError),
}
