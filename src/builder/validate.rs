//! Structural validation of the three caller tables.
//!
//! [`validate_tables`] is what construction runs: it stops at the first
//! problem and reports it with a specific error. [`diagnose_tables`] runs
//! every check and accumulates all violations, which is handy when
//! authoring a large table.

use crate::builder::error::{BuildError, EventTableError, StateTableError};
use crate::core::{EventDescription, EventId, StateDescription, StateId, StateRow, MAX_ENTRIES};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Largest number of normalized states or events a table may define.
pub const MAX_NORMALIZED: usize = MAX_ENTRIES - 1;

/// Sizes of a validated table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TableCounts {
    pub number_states: usize,
    pub number_events: usize,
}

/// Validate the tables and the initial state, returning their sizes.
///
/// Checks run in a fixed order: the state count, state descriptions
/// against the state table, the initial state, the event count, event
/// descriptions, then every transition row against the event order.
///
/// # Example
///
/// ```rust
/// use tablefsm::builder::validate_tables;
/// use tablefsm::core::{EventDescription, StateDescription, StateId, StateRow, TransitionTuple};
///
/// let states = [StateDescription::new(0u32, "Only State")];
/// let events = [EventDescription::new(0u32, "Tick")];
/// let rows: Vec<StateRow<(), ()>> =
///     vec![StateRow::new(0u32, vec![TransitionTuple::quiet(0u32, 0u32)])];
///
/// let counts = validate_tables(StateId::new(0), &states, &events, &rows).unwrap();
/// assert_eq!(counts.number_states, 1);
/// assert_eq!(counts.number_events, 1);
/// ```
pub fn validate_tables<P, C>(
    initial: StateId,
    states: &[StateDescription],
    events: &[EventDescription],
    rows: &[StateRow<P, C>],
) -> Result<TableCounts, BuildError> {
    check_state_count(states)?;
    for (index, description) in states.iter().enumerate() {
        check_state_id(index, description)?;
        check_state_row(index, rows)?;
    }
    check_extra_rows(states, rows)?;
    let number_states = states.len();

    check_initial(initial, number_states)?;

    check_event_count(events)?;
    for (index, description) in events.iter().enumerate() {
        check_event_id(index, description)?;
    }
    let number_events = events.len();

    for row in rows {
        for index in 0..number_events {
            check_tuple(row, index)?;
        }
        check_extra_tuples(row, number_events)?;
    }

    Ok(TableCounts {
        number_states,
        number_events,
    })
}

/// Run every structural check and accumulate ALL violations.
///
/// Unlike [`validate_tables`] this does not stop at the first problem, and
/// the first error [`validate_tables`] reports is always among the ones
/// returned here. Returns `Validation::Success(())` when the tables would
/// build.
pub fn diagnose_tables<P, C>(
    initial: StateId,
    states: &[StateDescription],
    events: &[EventDescription],
    rows: &[StateRow<P, C>],
) -> Check {
    let mut checks: Vec<Check> = vec![check(check_state_count(states))];
    for (index, description) in states.iter().enumerate() {
        checks.push(check(check_state_id(index, description)));
        checks.push(check(check_state_row(index, rows)));
    }
    checks.push(check(check_extra_rows(states, rows)));

    checks.push(check(check_initial(initial, states.len())));

    checks.push(check(check_event_count(events)));
    for (index, description) in events.iter().enumerate() {
        checks.push(check(check_event_id(index, description)));
    }

    // Rows are judged against the described events even when the event
    // table itself is malformed, so every misaligned tuple shows up.
    let number_events = events.len();
    for row in rows {
        for index in 0..number_events {
            checks.push(check(check_tuple(row, index)));
        }
        checks.push(check(check_extra_tuples(row, number_events)));
    }

    Validation::all_vec(checks).map(|_| ())
}

type Check = Validation<(), NonEmptyVec<BuildError>>;

fn check(result: Result<(), BuildError>) -> Check {
    match result {
        Ok(()) => Validation::success(()),
        Err(err) => Validation::fail(err),
    }
}

fn check_state_count(states: &[StateDescription]) -> Result<(), BuildError> {
    if states.len() > MAX_NORMALIZED {
        return Err(StateTableError::TooManyStates {
            count: states.len(),
            max: MAX_NORMALIZED,
        }
        .into());
    }
    if states.is_empty() {
        return Err(StateTableError::Empty.into());
    }
    Ok(())
}

fn check_state_id(index: usize, description: &StateDescription) -> Result<(), BuildError> {
    if description.id.index() != index {
        return Err(StateTableError::NonContiguous {
            index,
            found: description.id,
        }
        .into());
    }
    Ok(())
}

fn check_state_row<P, C>(index: usize, rows: &[StateRow<P, C>]) -> Result<(), BuildError> {
    let state = StateId::new(index as u32);
    let row = rows.get(index).ok_or(StateTableError::MissingRow { state })?;

    if row.state.index() != index {
        return Err(StateTableError::RowMismatch {
            index,
            found: row.state,
        }
        .into());
    }
    if row.transitions.is_empty() {
        return Err(StateTableError::NoTransitions { state }.into());
    }
    Ok(())
}

fn check_extra_rows<P, C>(
    states: &[StateDescription],
    rows: &[StateRow<P, C>],
) -> Result<(), BuildError> {
    if rows.len() > states.len() {
        return Err(StateTableError::ExtraRows {
            expected: states.len(),
            found: rows.len(),
        }
        .into());
    }
    Ok(())
}

fn check_initial(initial: StateId, number_states: usize) -> Result<(), BuildError> {
    if initial.index() >= number_states {
        return Err(BuildError::InvalidInitialState {
            initial,
            number_states,
        });
    }
    Ok(())
}

fn check_event_count(events: &[EventDescription]) -> Result<(), BuildError> {
    if events.len() > MAX_NORMALIZED {
        return Err(EventTableError::TooManyEvents {
            count: events.len(),
            max: MAX_NORMALIZED,
        }
        .into());
    }
    if events.is_empty() {
        return Err(EventTableError::Empty.into());
    }
    Ok(())
}

fn check_event_id(index: usize, description: &EventDescription) -> Result<(), BuildError> {
    if description.id.index() != index {
        return Err(EventTableError::NonContiguous {
            index,
            found: description.id,
        }
        .into());
    }
    Ok(())
}

fn check_tuple<P, C>(row: &StateRow<P, C>, index: usize) -> Result<(), BuildError> {
    let event = EventId::new(index as u32);
    match row.tuple(event) {
        None => Err(EventTableError::MissingTuple {
            state: row.state,
            event,
        }
        .into()),
        Some(tuple) if tuple.event != event => Err(EventTableError::TupleMismatch {
            state: row.state,
            index,
            found: tuple.event,
        }
        .into()),
        Some(_) => Ok(()),
    }
}

fn check_extra_tuples<P, C>(row: &StateRow<P, C>, number_events: usize) -> Result<(), BuildError> {
    if row.transitions.len() > number_events {
        return Err(EventTableError::ExtraTuples {
            state: row.state,
            expected: number_events,
            found: row.transitions.len(),
        }
        .into());
    }
    Ok(())
}
