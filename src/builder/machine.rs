//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::validate::diagnose_tables;
use crate::core::{EventDescription, StateDescription, StateId, StateRow};
use crate::engine::{Machine, DEFAULT_NAME};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state machines with a fluent API.
///
/// The tables are borrowed, not copied; they must outlive the machine.
///
/// # Example
///
/// ```rust
/// use tablefsm::builder::MachineBuilder;
/// use tablefsm::core::{EventDescription, StateDescription, StateId, StateRow, TransitionTuple};
///
/// let states = [StateDescription::new(0u32, "Idle")];
/// let events = [EventDescription::new(0u32, "Poll")];
/// let rows: Vec<StateRow<(), ()>> =
///     vec![StateRow::new(0u32, vec![TransitionTuple::quiet(0u32, 0u32)])];
///
/// let machine = MachineBuilder::new()
///     .name("poller")
///     .initial(0u32)
///     .states(&states)
///     .events(&events)
///     .table(&rows)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_state(), StateId::new(0));
/// ```
pub struct MachineBuilder<'t, P, C> {
    name: Option<String>,
    initial: Option<StateId>,
    states: &'t [StateDescription],
    events: &'t [EventDescription],
    rows: &'t [StateRow<P, C>],
}

impl<'t, P, C> MachineBuilder<'t, P, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            name: None,
            initial: None,
            states: &[],
            events: &[],
            rows: &[],
        }
    }

    /// Set the machine name used in logs and dumps (optional).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<StateId>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Set the state description table.
    pub fn states(mut self, states: &'t [StateDescription]) -> Self {
        self.states = states;
        self
    }

    /// Set the event description table.
    pub fn events(mut self, events: &'t [EventDescription]) -> Self {
        self.events = events;
        self
    }

    /// Set the state table: one row per state, in state order.
    pub fn table(mut self, rows: &'t [StateRow<P, C>]) -> Self {
        self.rows = rows;
        self
    }

    /// Report every structural problem with the configured tables.
    ///
    /// A missing initial state is checked as state 0.
    pub fn diagnose(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        diagnose_tables(
            self.initial.unwrap_or(StateId::new(0)),
            self.states,
            self.events,
            self.rows,
        )
    }

    /// Validate the tables and build the machine.
    pub fn build(self) -> Result<Machine<'t, P, C>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());

        Machine::create(name, initial, self.states, self.events, self.rows)
    }
}

impl<'t, P, C> Default for MachineBuilder<'t, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::error::{EventTableError, StateTableError};
    use crate::core::{HandlerOutcome, TransitionTuple};

    fn ok(_: &(), _: &mut ()) -> HandlerOutcome {
        HandlerOutcome::ok()
    }

    fn states() -> Vec<StateDescription> {
        vec![
            StateDescription::new(0u32, "Closed"),
            StateDescription::new(1u32, "Open"),
        ]
    }

    fn events() -> Vec<EventDescription> {
        vec![
            EventDescription::new(0u32, "Open"),
            EventDescription::new(1u32, "Close"),
        ]
    }

    fn rows() -> Vec<StateRow<(), ()>> {
        vec![
            StateRow::new(
                0u32,
                vec![
                    TransitionTuple::new(0u32, ok, 1u32),
                    TransitionTuple::quiet(1u32, 0u32),
                ],
            ),
            StateRow::new(
                1u32,
                vec![
                    TransitionTuple::quiet(0u32, 1u32),
                    TransitionTuple::new(1u32, ok, 0u32),
                ],
            ),
        ]
    }

    #[test]
    fn builder_validates_required_fields() {
        let (s, e, r) = (states(), events(), rows());
        let result = MachineBuilder::new().states(&s).events(&e).table(&r).build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_tables() {
        let result = MachineBuilder::<(), ()>::new().initial(0u32).build();

        assert!(matches!(
            result,
            Err(BuildError::InvalidStateTable(StateTableError::Empty))
        ));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let (s, e, r) = (states(), events(), rows());
        let machine = MachineBuilder::new()
            .name("door")
            .initial(1u32)
            .states(&s)
            .events(&e)
            .table(&r)
            .build()
            .unwrap();

        assert_eq!(machine.name(), "door");
        assert_eq!(machine.current_state(), StateId::new(1));
    }

    #[test]
    fn unnamed_machine_gets_default_name() {
        let (s, e, r) = (states(), events(), rows());
        let machine = MachineBuilder::new()
            .initial(0u32)
            .states(&s)
            .events(&e)
            .table(&r)
            .build()
            .unwrap();

        assert_eq!(machine.name(), DEFAULT_NAME);
    }

    #[test]
    fn build_surfaces_event_table_errors() {
        let (s, mut e, r) = (states(), events(), rows());
        e[1].id = 0u32.into();

        let result = MachineBuilder::new()
            .initial(0u32)
            .states(&s)
            .events(&e)
            .table(&r)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::InvalidEventTable(EventTableError::NonContiguous { index: 1, .. }))
        ));
    }

    #[test]
    fn diagnose_reports_everything_at_once() {
        let (s, r) = (states(), rows());
        let builder = MachineBuilder::new().initial(5u32).states(&s).table(&r);

        match builder.diagnose() {
            Validation::Failure(errors) => {
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, BuildError::InvalidInitialState { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, BuildError::InvalidEventTable(EventTableError::Empty))));
                assert!(errors.iter().any(|e| matches!(
                    e,
                    BuildError::InvalidEventTable(EventTableError::ExtraTuples { .. })
                )));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }
}
