//! Build errors for table validation and machine construction.

use crate::core::{EventId, StateId};
use std::collections::TryReserveError;
use thiserror::Error;

/// Structural problems in the state description table or the state table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateTableError {
    #[error("State table is empty. Define at least one state")]
    Empty,

    #[error("State table has {count} states, at most {max} are allowed")]
    TooManyStates { count: usize, max: usize },

    #[error("State description {index} has id {found}; ids must be 0, 1, 2, ...")]
    NonContiguous { index: usize, found: StateId },

    #[error("State table row {index} is for state {found}; rows must follow the description order")]
    RowMismatch { index: usize, found: StateId },

    #[error("State {state} has no transition row")]
    MissingRow { state: StateId },

    #[error("State {state} has an empty transition row")]
    NoTransitions { state: StateId },

    #[error("State table has {found} rows but only {expected} states are described")]
    ExtraRows { expected: usize, found: usize },
}

/// Structural problems in the event description table or a transition row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventTableError {
    #[error("Event table is empty. Define at least one event")]
    Empty,

    #[error("Event table has {count} events, at most {max} are allowed")]
    TooManyEvents { count: usize, max: usize },

    #[error("Event description {index} has id {found}; ids must be 0, 1, 2, ...")]
    NonContiguous { index: usize, found: EventId },

    #[error("State {state} transition {index} is for event {found}; tuples must follow event order")]
    TupleMismatch {
        state: StateId,
        index: usize,
        found: EventId,
    },

    #[error("State {state} has no transition for event {event}")]
    MissingTuple { state: StateId, event: EventId },

    #[error("State {state} has {found} transitions but only {expected} events are described")]
    ExtraTuples {
        state: StateId,
        expected: usize,
        found: usize,
    },
}

/// Errors that can occur when creating a state machine.
///
/// Construction is all or nothing: on any of these no machine exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Invalid state table: {0}")]
    InvalidStateTable(#[from] StateTableError),

    #[error("Invalid event table: {0}")]
    InvalidEventTable(#[from] EventTableError),

    #[error("Initial state {initial} is out of range, the table defines {number_states} states")]
    InvalidInitialState {
        initial: StateId,
        number_states: usize,
    },

    #[error("Unable to allocate state machine history: {0}")]
    NoResources(#[from] TryReserveError),
}
