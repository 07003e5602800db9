//! Transition tuples and state rows supplied by the caller.

use super::handler::{EventHandler, HandlerOutcome, SharedHandler};
use super::id::{EventId, StateId};
use std::fmt;
use std::sync::Arc;

/// `(event, handler, next_state)` for one (state, event) pair.
///
/// A tuple without a handler is a quiet event: the engine records it but
/// never applies `next_state`.
pub struct TransitionTuple<P, C> {
    pub event: EventId,
    pub handler: Option<SharedHandler<P, C>>,
    pub next_state: StateId,
}

impl<P, C> TransitionTuple<P, C> {
    /// Tuple driven by a closure or function.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tablefsm::core::{HandlerOutcome, TransitionTuple};
    ///
    /// let tuple: TransitionTuple<(), ()> =
    ///     TransitionTuple::new(0u32, |_: &(), _: &mut ()| HandlerOutcome::ok(), 1u32);
    /// assert!(!tuple.is_quiet());
    /// ```
    pub fn new<F>(event: impl Into<EventId>, handler: F, next_state: impl Into<StateId>) -> Self
    where
        F: Fn(&P, &mut C) -> HandlerOutcome + Send + Sync + 'static,
    {
        Self {
            event: event.into(),
            handler: Some(Arc::new(handler)),
            next_state: next_state.into(),
        }
    }

    /// Tuple driven by a handler shared with other tuples.
    pub fn shared(
        event: impl Into<EventId>,
        handler: &SharedHandler<P, C>,
        next_state: impl Into<StateId>,
    ) -> Self {
        Self {
            event: event.into(),
            handler: Some(Arc::clone(handler)),
            next_state: next_state.into(),
        }
    }

    /// Tuple with no handler.
    pub fn quiet(event: impl Into<EventId>, next_state: impl Into<StateId>) -> Self {
        Self {
            event: event.into(),
            handler: None,
            next_state: next_state.into(),
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.handler.is_none()
    }

    pub(crate) fn handler(&self) -> Option<&dyn EventHandler<P, C>> {
        self.handler.as_deref()
    }
}

impl<P, C> Clone for TransitionTuple<P, C> {
    fn clone(&self) -> Self {
        Self {
            event: self.event,
            handler: self.handler.clone(),
            next_state: self.next_state,
        }
    }
}

impl<P, C> fmt::Debug for TransitionTuple<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTuple")
            .field("event", &self.event)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .field("next_state", &self.next_state)
            .finish()
    }
}

/// One entry of the state table: a state and its transition row.
///
/// The row holds one tuple per normalized event, in event order.
pub struct StateRow<P, C> {
    pub state: StateId,
    pub transitions: Vec<TransitionTuple<P, C>>,
}

impl<P, C> StateRow<P, C> {
    pub fn new(state: impl Into<StateId>, transitions: Vec<TransitionTuple<P, C>>) -> Self {
        Self {
            state: state.into(),
            transitions,
        }
    }

    /// Tuple for `event`, if the row has one at that index.
    pub fn tuple(&self, event: EventId) -> Option<&TransitionTuple<P, C>> {
        self.transitions.get(event.index())
    }
}

impl<P, C> Clone for StateRow<P, C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            transitions: self.transitions.clone(),
        }
    }
}

impl<P, C> fmt::Debug for StateRow<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRow")
            .field("state", &self.state)
            .field("transitions", &self.transitions)
            .finish()
    }
}
