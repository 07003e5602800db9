//! Read-only views of a machine for diagnostics.
//!
//! Dumps are meant for people, not parsers. For machine-readable output use
//! [`Machine::snapshot`] and [`MachineSnapshot::to_json`].

use crate::core::{EventId, HistoryRecord, RecordOutcome, StateId};
use crate::engine::Machine;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Serializable picture of a machine at one point in time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub name: String,
    pub current_state: StateId,
    pub number_states: usize,
    pub number_events: usize,
    /// Held records, most recent first
    pub history: Vec<HistoryRecord>,
}

impl MachineSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'t, P, C> Machine<'t, P, C> {
    /// Write the state table: every state with each event and its next state.
    pub fn dump_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "FSM: {}", self.name)?;
        writeln!(out, "    number_states = {}", self.counts.number_states)?;
        writeln!(out, "    number_events = {}", self.counts.number_events)?;
        writeln!(out, "    curr_state = {}", self.state_label(self.current))?;
        writeln!(out)?;

        for row in self.rows {
            writeln!(out, " State: {}", self.state_label(row.state))?;
            writeln!(out, " Event   /   Next State")?;
            writeln!(out, "----------------------------")?;
            for tuple in &row.transitions {
                let quiet = if tuple.is_quiet() { " (quiet)" } else { "" };
                writeln!(
                    out,
                    "  {}-{} / {}{}",
                    tuple.event,
                    self.event_label(tuple.event),
                    self.state_label(tuple.next_state),
                    quiet
                )?;
            }
            writeln!(out)?;
        }
        writeln!(out)
    }

    /// Write the history, most recent record first.
    pub fn dump_history<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "FSM: {} History", self.name)?;
        writeln!(out, "Current State  /   Event   /  New State  /  rc")?;
        writeln!(out, "------------------------------------------------")?;

        for record in self.history.iter() {
            writeln!(
                out,
                " {}-{}  /  {}-{}  /  {}-{}  /  {}",
                record.previous_state,
                self.state_label(record.previous_state),
                record.event,
                self.event_label(record.event),
                record.new_state,
                self.state_label(record.new_state),
                outcome_label(record.outcome)
            )?;
        }
        writeln!(out)
    }

    /// [`dump_table`](Self::dump_table) to standard output.
    pub fn print_table(&self) -> io::Result<()> {
        self.dump_table(&mut io::stdout().lock())
    }

    /// [`dump_history`](Self::dump_history) to standard output.
    pub fn print_history(&self) -> io::Result<()> {
        self.dump_history(&mut io::stdout().lock())
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            name: self.name.clone(),
            current_state: self.current,
            number_states: self.counts.number_states,
            number_events: self.counts.number_events,
            history: self.history.iter().cloned().collect(),
        }
    }

    fn state_label(&self, state: StateId) -> String {
        match self.state_description(state) {
            Some(description) => description.to_string(),
            None => format!("<invalid state {state}>"),
        }
    }

    fn event_label(&self, event: EventId) -> String {
        match self.event_description(event) {
            Some(description) => description.to_string(),
            None => format!("<invalid event {event}>"),
        }
    }
}

fn outcome_label(outcome: RecordOutcome) -> String {
    match outcome {
        RecordOutcome::Committed => "ok".to_string(),
        RecordOutcome::QuietEvent => "quiet".to_string(),
        RecordOutcome::Ignored => "ignored".to_string(),
        RecordOutcome::InvalidEvent => "invalid event".to_string(),
        RecordOutcome::InvalidState => "invalid state".to_string(),
        RecordOutcome::HandlerFailed { code } => format!("handler error {code}"),
    }
}
