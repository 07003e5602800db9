//! Fixed-capacity history of processed events.
//!
//! Every event the engine sees (except one answered with
//! [`HandlerOutcome::Stop`](super::HandlerOutcome::Stop)) leaves a record in
//! a ring of [`HISTORY_CAPACITY`] slots. Older records are overwritten first.

use super::id::{EventId, StateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use thiserror::Error;

/// Number of records kept before the oldest is overwritten.
pub const HISTORY_CAPACITY: usize = 64;

/// How the engine finished with a recorded event.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RecordOutcome {
    /// Handler succeeded and the next state was committed.
    Committed,
    /// No handler for the event in this state.
    QuietEvent,
    /// Handler asked for the event to be ignored.
    Ignored,
    /// Event id outside the normalized range.
    InvalidEvent,
    /// Resolved next state outside the normalized range.
    InvalidState,
    /// Handler reported a failure.
    HandlerFailed { code: u32 },
}

impl RecordOutcome {
    /// True when the record reflects a committed state change.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Record of a single processed event.
///
/// `new_state` is the state the engine resolved, which is only the actual
/// state after the event when `outcome` is [`RecordOutcome::Committed`].
///
/// # Example
///
/// ```rust
/// use tablefsm::core::{EventId, History, HistoryRecord, RecordOutcome, StateId};
/// use chrono::Utc;
///
/// let mut history = History::new().unwrap();
/// history.record(HistoryRecord {
///     sequence: 0,
///     previous_state: StateId::new(0),
///     new_state: StateId::new(1),
///     event: EventId::new(0),
///     outcome: RecordOutcome::Committed,
///     at: Utc::now(),
/// });
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Position of this record among all records ever written
    pub sequence: u64,
    /// State when the event arrived
    pub previous_state: StateId,
    /// State resolved for the event
    pub new_state: StateId,
    /// Raw event id as submitted, possibly out of range
    pub event: EventId,
    /// How processing ended
    pub outcome: RecordOutcome,
    /// When the event was processed
    pub at: DateTime<Utc>,
}

/// Ring buffer of [`HistoryRecord`]s.
///
/// Slots start empty. Each write first advances the write index and then
/// fills that slot, so the slot at the write index is always the newest.
/// Deserialization rejects rings that are not [`HISTORY_CAPACITY`] slots
/// long or whose write index is out of range.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawHistory")]
pub struct History {
    slots: Vec<Option<HistoryRecord>>,
    index: usize,
    written: u64,
}

/// A serialized ring that does not fit the fixed layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("History has {found} slots, expected {expected}")]
    WrongCapacity { expected: usize, found: usize },

    #[error("History write index {index} is outside {capacity} slots")]
    IndexOutOfRange { index: usize, capacity: usize },
}

#[derive(Deserialize)]
struct RawHistory {
    slots: Vec<Option<HistoryRecord>>,
    index: usize,
    written: u64,
}

impl TryFrom<RawHistory> for History {
    type Error = HistoryError;

    fn try_from(raw: RawHistory) -> Result<Self, Self::Error> {
        if raw.slots.len() != HISTORY_CAPACITY {
            return Err(HistoryError::WrongCapacity {
                expected: HISTORY_CAPACITY,
                found: raw.slots.len(),
            });
        }
        if raw.index >= HISTORY_CAPACITY {
            return Err(HistoryError::IndexOutOfRange {
                index: raw.index,
                capacity: HISTORY_CAPACITY,
            });
        }
        Ok(Self {
            slots: raw.slots,
            index: raw.index,
            written: raw.written,
        })
    }
}

impl History {
    /// Allocate an empty history.
    ///
    /// Fails only if the ring cannot be allocated.
    pub fn new() -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(HISTORY_CAPACITY)?;
        slots.resize(HISTORY_CAPACITY, None);
        Ok(Self {
            slots,
            index: 0,
            written: 0,
        })
    }

    /// Store a record, overwriting the oldest one once the ring is full.
    pub fn record(&mut self, record: HistoryRecord) {
        self.index = (self.index + 1) % HISTORY_CAPACITY;
        self.slots[self.index] = Some(record);
        self.written += 1;
    }

    /// Sequence number the next record will carry.
    pub fn next_sequence(&self) -> u64 {
        self.written
    }

    /// Records currently held, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> + '_ {
        let newest = self.index;
        (0..HISTORY_CAPACITY)
            .map(move |back| (newest + HISTORY_CAPACITY - back) % HISTORY_CAPACITY)
            .filter_map(move |slot| self.slots[slot].as_ref())
    }

    /// Most recent record, if any.
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.slots[self.index].as_ref()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Total number of records written, including overwritten ones.
    pub fn total_recorded(&self) -> u64 {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequence: u64, from: u32, to: u32) -> HistoryRecord {
        HistoryRecord {
            sequence,
            previous_state: StateId::new(from),
            new_state: StateId::new(to),
            event: EventId::new(0),
            outcome: RecordOutcome::Committed,
            at: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = History::new().unwrap();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.latest().is_none());
        assert_eq!(history.iter().count(), 0);
    }

    #[test]
    fn record_lands_after_the_write_index() {
        let mut history = History::new().unwrap();
        history.record(record(0, 0, 1));

        assert!(history.slots[0].is_none());
        assert_eq!(history.slots[1].as_ref().map(|r| r.sequence), Some(0));
    }

    #[test]
    fn iter_yields_most_recent_first() {
        let mut history = History::new().unwrap();
        history.record(record(0, 0, 1));
        history.record(record(1, 1, 2));
        history.record(record(2, 2, 3));

        let sequences: Vec<u64> = history.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![2, 1, 0]);
        assert_eq!(history.latest().map(|r| r.sequence), Some(2));
    }

    #[test]
    fn ring_overwrites_oldest_first() {
        let mut history = History::new().unwrap();
        let total = HISTORY_CAPACITY as u64 + 10;
        for seq in 0..total {
            history.record(record(seq, 0, 0));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.total_recorded(), total);

        let sequences: Vec<u64> = history.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences.len(), HISTORY_CAPACITY);
        assert_eq!(sequences[0], total - 1);
        assert_eq!(*sequences.last().unwrap(), total - HISTORY_CAPACITY as u64);
        assert!(sequences.windows(2).all(|w| w[0] == w[1] + 1));
    }

    #[test]
    fn full_ring_wraps_through_slot_zero() {
        let mut history = History::new().unwrap();
        for seq in 0..HISTORY_CAPACITY as u64 {
            history.record(record(seq, 0, 0));
        }

        assert_eq!(history.index, 0);
        assert!(history.slots.iter().all(Option::is_some));
    }

    #[test]
    fn iteration_does_not_mutate() {
        let mut history = History::new().unwrap();
        history.record(record(0, 0, 1));

        let first: Vec<u64> = history.iter().map(|r| r.sequence).collect();
        let second: Vec<u64> = history.iter().map(|r| r.sequence).collect();
        assert_eq!(first, second);
        assert_eq!(history.next_sequence(), 1);
    }

    #[test]
    fn outcome_reports_commit() {
        assert!(RecordOutcome::Committed.is_committed());
        assert!(!RecordOutcome::QuietEvent.is_committed());
        assert!(!RecordOutcome::HandlerFailed { code: 3 }.is_committed());
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = History::new().unwrap();
        history.record(record(0, 0, 1));
        history.record(HistoryRecord {
            outcome: RecordOutcome::HandlerFailed { code: 7 },
            ..record(1, 1, 2)
        });

        let json = serde_json::to_string(&history).unwrap();
        let back: History = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 2);
        assert_eq!(
            back.latest().map(|r| r.outcome),
            Some(RecordOutcome::HandlerFailed { code: 7 })
        );
    }

    #[test]
    fn malformed_ring_fails_to_deserialize() {
        let short = serde_json::from_str::<History>(r#"{"slots":[],"index":5,"written":0}"#);
        assert!(short.is_err());

        let two_slots = serde_json::from_str::<History>(
            r#"{"slots":[null,null],"index":1,"written":0}"#,
        );
        assert!(two_slots.is_err());

        let mut value = serde_json::to_value(History::new().unwrap()).unwrap();
        value["index"] = serde_json::json!(HISTORY_CAPACITY);
        let err = serde_json::from_value::<History>(value).unwrap_err();
        assert!(err.to_string().contains("write index 64"));
    }

    #[test]
    fn raw_ring_is_checked_before_use() {
        let raw = RawHistory {
            slots: vec![None; 3],
            index: 0,
            written: 0,
        };
        assert_eq!(
            History::try_from(raw).unwrap_err(),
            HistoryError::WrongCapacity {
                expected: HISTORY_CAPACITY,
                found: 3,
            }
        );
    }
}
