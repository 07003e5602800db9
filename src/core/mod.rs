//! Core table types and logic.
//!
//! This module contains the building blocks the engine works with:
//! - Normalized state and event identifiers with their descriptions
//! - Transition tuples and state rows
//! - The handler capability and its outcomes
//! - The fixed-capacity history ring

mod handler;
mod history;
mod id;
mod table;

pub use handler::{handler, EventHandler, HandlerError, HandlerOutcome, SharedHandler, Transition};
pub use history::{History, HistoryError, HistoryRecord, RecordOutcome, HISTORY_CAPACITY};
pub use id::{EventDescription, EventId, StateDescription, StateId, MAX_ENTRIES};
pub use table::{StateRow, TransitionTuple};
