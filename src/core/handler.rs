//! Event handler capability and handler results.
//!
//! A handler runs synchronously inside `Machine::process_event`. It receives
//! the raw event payload and the caller's context untouched and tells the
//! engine how to continue by returning a [`HandlerOutcome`].

use super::id::StateId;
use std::sync::Arc;
use thiserror::Error;

/// Where a successful handler wants the machine to go.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    /// Follow the next state declared in the transition tuple.
    UseTableDefault,

    /// Exception transition: go to this state instead of the declared one.
    /// Applies to the current dispatch only.
    Override(StateId),
}

/// Failure reported by a handler.
///
/// The code is application defined and is kept in the history record.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("handler failed with code {code}: {message}")]
pub struct HandlerError {
    pub code: u32,
    pub message: String,
}

impl HandlerError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Result of running an event handler.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum HandlerOutcome {
    /// Event handled; resolve and commit the next state.
    Proceed(Transition),

    /// Event deliberately ignored; no transition, dispatch still succeeds.
    Ignore,

    /// Event processing failed; the current state is kept.
    Fail(HandlerError),

    /// Stop processing. The engine must not touch the instance again
    /// during this dispatch, not even to record history.
    Stop,
}

impl HandlerOutcome {
    /// Success using the transition tuple's declared next state.
    pub fn ok() -> Self {
        Self::Proceed(Transition::UseTableDefault)
    }

    /// Success with an exception transition to `state`.
    pub fn override_to(state: impl Into<StateId>) -> Self {
        Self::Proceed(Transition::Override(state.into()))
    }

    pub fn fail(code: u32, message: impl Into<String>) -> Self {
        Self::Fail(HandlerError::new(code, message))
    }
}

/// Capability invoked by the engine for one (state, event) pair.
///
/// `P` is the raw event payload, `C` the caller's context. Any
/// `Fn(&P, &mut C) -> HandlerOutcome` closure or function is a handler.
///
/// # Example
///
/// ```rust
/// use tablefsm::core::{EventHandler, HandlerOutcome};
///
/// struct Counter {
///     seen: u32,
/// }
///
/// let count = |_payload: &(), ctx: &mut Counter| {
///     ctx.seen += 1;
///     HandlerOutcome::ok()
/// };
///
/// let mut ctx = Counter { seen: 0 };
/// assert_eq!(count.handle(&(), &mut ctx), HandlerOutcome::ok());
/// assert_eq!(ctx.seen, 1);
/// ```
pub trait EventHandler<P, C>: Send + Sync {
    fn handle(&self, payload: &P, context: &mut C) -> HandlerOutcome;
}

impl<P, C, F> EventHandler<P, C> for F
where
    F: Fn(&P, &mut C) -> HandlerOutcome + Send + Sync,
{
    fn handle(&self, payload: &P, context: &mut C) -> HandlerOutcome {
        self(payload, context)
    }
}

/// Handler shared between several transition tuples.
pub type SharedHandler<P, C> = Arc<dyn EventHandler<P, C>>;

/// Wrap a closure or function as a [`SharedHandler`].
///
/// Use this when the same handler serves many tuples, for example a
/// catch-all "ignore" handler.
pub fn handler<P, C, F>(f: F) -> SharedHandler<P, C>
where
    F: Fn(&P, &mut C) -> HandlerOutcome + Send + Sync + 'static,
{
    Arc::new(f)
}
