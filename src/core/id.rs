//! Normalized state and event identifiers.
//!
//! Identifiers are dense: `0, 1, 2, ...`. The identifier doubles as the index
//! into the description tables and the per-state transition rows, so the
//! engine never searches, it indexes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on entries scanned in a description table.
///
/// A table may hold at most `MAX_ENTRIES - 1` normalized states or events.
pub const MAX_ENTRIES: usize = 64;

/// Normalized state identifier in `[0, number_states)`.
///
/// # Example
///
/// ```rust
/// use tablefsm::core::StateId;
///
/// let idle = StateId::new(0);
/// assert_eq!(idle.index(), 0);
/// assert_eq!(StateId::from(3u32), StateId::new(3));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u32);

impl StateId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Position of this state in the description table and state table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for StateId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized event identifier in `[0, number_events)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Position of this event in the description table and in every
    /// transition row.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for EventId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the caller's state description table.
///
/// # Example
///
/// ```rust
/// use tablefsm::core::{StateDescription, StateId};
///
/// let states = [
///     StateDescription::new(0, "Idle State"),
///     StateDescription::new(1, "Established State"),
/// ];
/// assert_eq!(states[1].id, StateId::new(1));
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct StateDescription {
    pub id: StateId,
    pub description: String,
}

impl StateDescription {
    pub fn new(id: impl Into<StateId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// One entry of the caller's event description table.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EventDescription {
    pub id: EventId,
    pub description: String,
}

impl EventDescription {
    pub fn new(id: impl Into<EventId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_index_their_tables() {
        assert_eq!(StateId::new(5).index(), 5);
        assert_eq!(EventId::new(7).index(), 7);
    }

    #[test]
    fn ids_order_numerically() {
        assert!(StateId::new(1) < StateId::new(2));
        assert!(EventId::new(0) < EventId::new(63));
    }

    #[test]
    fn ids_display_as_plain_numbers() {
        assert_eq!(StateId::new(12).to_string(), "12");
        assert_eq!(EventId::new(3).to_string(), "3");
    }

    #[test]
    fn descriptions_accept_raw_ids() {
        let state = StateDescription::new(2u32, "Established State");
        assert_eq!(state.id, StateId::new(2));
        assert_eq!(state.description, "Established State");

        let event = EventDescription::new(4u32, "Start Session Termination");
        assert_eq!(event.id, EventId::new(4));
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&StateId::new(3)).unwrap();
        assert_eq!(json, "3");

        let event: EventId = serde_json::from_str("6").unwrap();
        assert_eq!(event, EventId::new(6));
    }

    #[test]
    fn description_roundtrips_through_json() {
        let state = StateDescription::new(1u32, "Wait for Init Ack State");
        let json = serde_json::to_string(&state).unwrap();
        let back: StateDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
