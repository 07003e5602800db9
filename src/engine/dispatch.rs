//! Result of a successful dispatch.

use crate::core::StateId;

/// How `Machine::process_event` finished when it did not fail.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dispatch {
    /// The next state was committed. `exception` is set when the handler
    /// overrode the table's declared next state.
    Transitioned {
        from: StateId,
        to: StateId,
        exception: bool,
    },

    /// No handler for the event in the current state; nothing changed.
    Quiet,

    /// The handler chose to ignore the event; nothing changed.
    Ignored,

    /// The handler asked to stop. Nothing was recorded and the instance
    /// should not be driven further by this call chain.
    Stopped,
}

impl Dispatch {
    /// State committed by the dispatch, if any.
    pub fn new_state(&self) -> Option<StateId> {
        match self {
            Self::Transitioned { to, .. } => Some(*to),
            _ => None,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}
