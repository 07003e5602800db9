//! The state machine instance and its transition engine.

use crate::builder::{validate_tables, BuildError, TableCounts};
use crate::core::{
    EventDescription, EventHandler, EventId, HandlerOutcome, History, HistoryRecord, RecordOutcome,
    StateDescription, StateId, StateRow, Transition,
};
use crate::engine::dispatch::Dispatch;
use crate::engine::error::FsmError;
use chrono::Utc;
use tracing::{debug, trace, warn};

/// Name used when the caller does not supply one.
pub const DEFAULT_NAME: &str = "State Machine";

/// Longest machine name kept, in characters.
pub const MAX_NAME_LEN: usize = 32;

/// A running table-driven state machine.
///
/// The machine borrows the caller's description tables and state table for
/// `'t` and owns only its history. `P` is the event payload type and `C`
/// the context handed to every handler.
pub struct Machine<'t, P, C> {
    pub(crate) name: String,
    pub(crate) current: StateId,
    pub(crate) counts: TableCounts,
    pub(crate) states: &'t [StateDescription],
    pub(crate) events: &'t [EventDescription],
    pub(crate) rows: &'t [StateRow<P, C>],
    pub(crate) history: History,
}

impl<'t, P, C> Machine<'t, P, C> {
    /// Validate the tables and create a machine in `initial`.
    ///
    /// Nothing is allocated unless every check passes. An empty `name`
    /// falls back to [`DEFAULT_NAME`]; longer names are truncated to
    /// [`MAX_NAME_LEN`] characters.
    pub fn create(
        name: impl Into<String>,
        initial: impl Into<StateId>,
        states: &'t [StateDescription],
        events: &'t [EventDescription],
        rows: &'t [StateRow<P, C>],
    ) -> Result<Self, BuildError> {
        let initial = initial.into();
        let counts = validate_tables(initial, states, events, rows)?;
        let history = History::new()?;

        let name = normalize_name(name.into());
        debug!(
            machine = %name,
            number_states = counts.number_states,
            number_events = counts.number_events,
            %initial,
            "state machine created"
        );

        Ok(Self {
            name,
            current: initial,
            counts,
            states,
            events,
            rows,
            history,
        })
    }

    /// Release the machine and its history.
    pub fn destroy(self) {
        debug!(machine = %self.name, "state machine destroyed");
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn number_states(&self) -> usize {
        self.counts.number_states
    }

    pub fn number_events(&self) -> usize {
        self.counts.number_events
    }

    pub fn state_description(&self, state: StateId) -> Option<&'t str> {
        self.states.get(state.index()).map(|s| s.description.as_str())
    }

    pub fn event_description(&self, event: EventId) -> Option<&'t str> {
        self.events.get(event.index()).map(|e| e.description.as_str())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Drive the machine with one event.
    ///
    /// Looks up the tuple for the current state and `event`, runs its
    /// handler with `payload` and `context`, then commits the resolved next
    /// state. Every path except [`HandlerOutcome::Stop`] leaves a history
    /// record. On any error the current state is unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tablefsm::core::{
    ///     EventDescription, HandlerOutcome, StateDescription, StateId, StateRow, TransitionTuple,
    /// };
    /// use tablefsm::engine::{Dispatch, Machine};
    ///
    /// fn toggle(_: &(), flips: &mut u32) -> HandlerOutcome {
    ///     *flips += 1;
    ///     HandlerOutcome::ok()
    /// }
    ///
    /// let states = [StateDescription::new(0u32, "Off"), StateDescription::new(1u32, "On")];
    /// let events = [EventDescription::new(0u32, "Press")];
    /// let rows = [
    ///     StateRow::new(0u32, vec![TransitionTuple::new(0u32, toggle, 1u32)]),
    ///     StateRow::new(1u32, vec![TransitionTuple::new(0u32, toggle, 0u32)]),
    /// ];
    ///
    /// let mut machine = Machine::create("switch", 0u32, &states, &events, &rows).unwrap();
    /// let mut flips = 0;
    ///
    /// let result = machine.process_event(0u32, &(), &mut flips).unwrap();
    /// assert!(matches!(result, Dispatch::Transitioned { .. }));
    /// assert_eq!(machine.current_state(), StateId::new(1));
    /// assert_eq!(flips, 1);
    /// ```
    pub fn process_event(
        &mut self,
        event: impl Into<EventId>,
        payload: &P,
        context: &mut C,
    ) -> Result<Dispatch, FsmError> {
        let event = event.into();
        let from = self.current;

        if event.index() >= self.counts.number_events {
            self.record(event, from, RecordOutcome::InvalidEvent);
            warn!(machine = %self.name, %event, state = %from, "event out of range");
            return Err(FsmError::InvalidEvent {
                event,
                number_events: self.counts.number_events,
            });
        }

        let rows = self.rows;
        let tuple = &rows[from.index()].transitions[event.index()];

        let Some(handler) = tuple.handler() else {
            self.record(event, tuple.next_state, RecordOutcome::QuietEvent);
            trace!(machine = %self.name, %event, state = %from, "quiet event");
            return Ok(Dispatch::Quiet);
        };

        let transition = match handler.handle(payload, context) {
            HandlerOutcome::Proceed(transition) => transition,
            // The handler may have retired this instance.
            HandlerOutcome::Stop => {
                trace!(%event, "handler stopped processing");
                return Ok(Dispatch::Stopped);
            }
            HandlerOutcome::Ignore => {
                self.record(event, tuple.next_state, RecordOutcome::Ignored);
                trace!(machine = %self.name, %event, state = %from, "event ignored by handler");
                return Ok(Dispatch::Ignored);
            }
            HandlerOutcome::Fail(err) => {
                self.record(
                    event,
                    tuple.next_state,
                    RecordOutcome::HandlerFailed { code: err.code },
                );
                warn!(machine = %self.name, %event, state = %from, code = err.code, "handler failed");
                return Err(FsmError::Handler(err));
            }
        };

        let (next, exception) = match transition {
            Transition::UseTableDefault => (tuple.next_state, false),
            Transition::Override(state) => (state, true),
        };

        if next.index() >= self.counts.number_states {
            self.record(event, next, RecordOutcome::InvalidState);
            warn!(machine = %self.name, %event, state = %from, next = %next, "next state out of range");
            return Err(FsmError::InvalidState {
                state: next,
                number_states: self.counts.number_states,
            });
        }

        self.record(event, next, RecordOutcome::Committed);
        self.current = next;
        debug!(
            machine = %self.name,
            %event,
            from = %from,
            to = %next,
            exception,
            "transition committed"
        );

        Ok(Dispatch::Transitioned {
            from,
            to: next,
            exception,
        })
    }

    fn record(&mut self, event: EventId, new_state: StateId, outcome: RecordOutcome) {
        let record = HistoryRecord {
            sequence: self.history.next_sequence(),
            previous_state: self.current,
            new_state,
            event,
            outcome,
            at: Utc::now(),
        };
        self.history.record(record);
    }
}

fn normalize_name(name: String) -> String {
    if name.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name.chars().take(MAX_NAME_LEN).collect()
    }
}
