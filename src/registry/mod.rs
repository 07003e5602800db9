//! Handle-based ownership of state machines.
//!
//! A [`MachineRegistry`] owns machines and hands out copyable
//! [`MachineHandle`]s. Destroying a machine clears the caller's handle and
//! retires every copy of it: a retired handle is reported as
//! [`FsmError::InvalidHandle`], a cleared one as [`FsmError::NullHandle`].
//! Handles carry a generation, so a slot reused by a later machine never
//! answers to an old handle.

use crate::builder::{BuildError, MachineBuilder};
use crate::core::{EventId, StateId};
use crate::engine::{Dispatch, FsmError, Machine};
use tracing::debug;

/// Opaque reference to a machine owned by a [`MachineRegistry`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MachineHandle {
    index: u32,
    generation: u32,
}

struct Slot<'t, P, C> {
    generation: u32,
    machine: Option<Machine<'t, P, C>>,
}

/// Owner of a set of machines sharing payload and context types.
///
/// # Example
///
/// ```rust
/// use tablefsm::builder::MachineBuilder;
/// use tablefsm::core::{EventDescription, StateDescription, StateRow, TransitionTuple};
/// use tablefsm::engine::FsmError;
/// use tablefsm::registry::MachineRegistry;
///
/// let states = [StateDescription::new(0u32, "Idle")];
/// let events = [EventDescription::new(0u32, "Poll")];
/// let rows: Vec<StateRow<(), ()>> =
///     vec![StateRow::new(0u32, vec![TransitionTuple::quiet(0u32, 0u32)])];
///
/// let mut registry = MachineRegistry::new();
/// let builder = MachineBuilder::new()
///     .initial(0u32)
///     .states(&states)
///     .events(&events)
///     .table(&rows);
/// let mut handle = Some(registry.create(builder).unwrap());
/// let stale = handle;
///
/// registry.destroy(&mut handle).unwrap();
/// assert!(handle.is_none());
/// assert_eq!(registry.current_state(handle), Err(FsmError::NullHandle));
/// assert_eq!(registry.current_state(stale), Err(FsmError::InvalidHandle));
/// ```
pub struct MachineRegistry<'t, P, C> {
    slots: Vec<Slot<'t, P, C>>,
    free: Vec<usize>,
}

impl<'t, P, C> MachineRegistry<'t, P, C> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Build a machine and take ownership of it.
    ///
    /// On a build error nothing is stored and no handle is issued.
    pub fn create(&mut self, builder: MachineBuilder<'t, P, C>) -> Result<MachineHandle, BuildError> {
        let machine = builder.build()?;
        Ok(self.insert(machine))
    }

    /// Take ownership of an already built machine.
    pub fn insert(&mut self, machine: Machine<'t, P, C>) -> MachineHandle {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].machine = Some(machine);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    machine: Some(machine),
                });
                self.slots.len() - 1
            }
        };

        MachineHandle {
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    /// Destroy the machine behind `handle` and clear the handle.
    pub fn destroy(&mut self, handle: &mut Option<MachineHandle>) -> Result<(), FsmError> {
        let current = handle.ok_or(FsmError::NullHandle)?;
        let slot = self.slot_mut(current)?;

        let machine = slot.machine.take().ok_or(FsmError::InvalidHandle)?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(current.index as usize);
        *handle = None;

        debug!(slot = current.index, "registry released machine");
        machine.destroy();
        Ok(())
    }

    pub fn get(&self, handle: impl Into<Option<MachineHandle>>) -> Result<&Machine<'t, P, C>, FsmError> {
        let handle = handle.into().ok_or(FsmError::NullHandle)?;
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.machine.as_ref())
            .ok_or(FsmError::InvalidHandle)
    }

    pub fn get_mut(
        &mut self,
        handle: impl Into<Option<MachineHandle>>,
    ) -> Result<&mut Machine<'t, P, C>, FsmError> {
        let handle = handle.into().ok_or(FsmError::NullHandle)?;
        self.slot_mut(handle)?
            .machine
            .as_mut()
            .ok_or(FsmError::InvalidHandle)
    }

    /// Drive the machine behind `handle` with one event.
    pub fn process_event(
        &mut self,
        handle: impl Into<Option<MachineHandle>>,
        event: impl Into<EventId>,
        payload: &P,
        context: &mut C,
    ) -> Result<Dispatch, FsmError> {
        self.get_mut(handle)?.process_event(event, payload, context)
    }

    pub fn current_state(&self, handle: impl Into<Option<MachineHandle>>) -> Result<StateId, FsmError> {
        self.get(handle).map(Machine::current_state)
    }

    /// Number of live machines.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.machine.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_mut(&mut self, handle: MachineHandle) -> Result<&mut Slot<'t, P, C>, FsmError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(FsmError::InvalidHandle)
    }
}

impl<'t, P, C> Default for MachineRegistry<'t, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventDescription, HandlerOutcome, StateDescription, StateRow, TransitionTuple};

    fn advance(_: &(), count: &mut u32) -> HandlerOutcome {
        *count += 1;
        HandlerOutcome::ok()
    }

    struct Tables {
        states: Vec<StateDescription>,
        events: Vec<EventDescription>,
        rows: Vec<StateRow<(), u32>>,
    }

    fn tables() -> Tables {
        Tables {
            states: vec![
                StateDescription::new(0u32, "Down"),
                StateDescription::new(1u32, "Up"),
            ],
            events: vec![EventDescription::new(0u32, "Flip")],
            rows: vec![
                StateRow::new(0u32, vec![TransitionTuple::new(0u32, advance, 1u32)]),
                StateRow::new(1u32, vec![TransitionTuple::new(0u32, advance, 0u32)]),
            ],
        }
    }

    fn builder(t: &Tables) -> MachineBuilder<'_, (), u32> {
        MachineBuilder::new()
            .initial(0u32)
            .states(&t.states)
            .events(&t.events)
            .table(&t.rows)
    }

    #[test]
    fn created_machine_is_reachable_by_handle() {
        let t = tables();
        let mut registry = MachineRegistry::new();
        let handle = registry.create(builder(&t)).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.current_state(handle), Ok(StateId::new(0)));

        let mut flips = 0;
        registry.process_event(handle, 0u32, &(), &mut flips).unwrap();
        assert_eq!(registry.current_state(handle), Ok(StateId::new(1)));
        assert_eq!(flips, 1);
    }

    #[test]
    fn failed_build_issues_no_handle() {
        let t = tables();
        let mut registry = MachineRegistry::new();

        let result = registry.create(builder(&t).initial(7u32));

        assert!(matches!(result, Err(BuildError::InvalidInitialState { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn destroy_clears_the_callers_handle() {
        let t = tables();
        let mut registry = MachineRegistry::new();
        let mut handle = Some(registry.create(builder(&t)).unwrap());

        registry.destroy(&mut handle).unwrap();

        assert!(handle.is_none());
        assert!(registry.is_empty());
        assert_eq!(registry.destroy(&mut handle), Err(FsmError::NullHandle));
        assert!(matches!(registry.get(handle), Err(FsmError::NullHandle)));
    }

    #[test]
    fn stale_handles_are_rejected_everywhere() {
        let t = tables();
        let mut registry = MachineRegistry::new();
        let mut handle = Some(registry.create(builder(&t)).unwrap());
        let stale = handle.unwrap();

        registry.destroy(&mut handle).unwrap();

        let mut flips = 0;
        assert_eq!(
            registry.process_event(stale, 0u32, &(), &mut flips),
            Err(FsmError::InvalidHandle)
        );
        assert_eq!(registry.current_state(stale), Err(FsmError::InvalidHandle));
        assert_eq!(registry.destroy(&mut Some(stale)), Err(FsmError::InvalidHandle));
        assert_eq!(flips, 0);
    }

    #[test]
    fn reused_slot_does_not_answer_old_handle() {
        let t = tables();
        let mut registry = MachineRegistry::new();
        let mut first = Some(registry.create(builder(&t)).unwrap());
        let stale = first.unwrap();
        registry.destroy(&mut first).unwrap();

        let second = registry.create(builder(&t)).unwrap();

        assert_ne!(second, stale);
        assert!(registry.get(second).is_ok());
        assert!(matches!(registry.get(stale), Err(FsmError::InvalidHandle)));
    }

    #[test]
    fn machines_are_independent() {
        let t = tables();
        let mut registry = MachineRegistry::new();
        let a = registry.create(builder(&t)).unwrap();
        let b = registry.create(builder(&t).name("second")).unwrap();

        let mut flips = 0;
        registry.process_event(a, 0u32, &(), &mut flips).unwrap();

        assert_eq!(registry.current_state(a), Ok(StateId::new(1)));
        assert_eq!(registry.current_state(b), Ok(StateId::new(0)));
        assert_eq!(registry.get(b).map(|m| m.name()), Ok("second"));
    }
}
