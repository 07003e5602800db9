//! The transition engine.
//!
//! A [`Machine`] is created from validated tables and then driven one event
//! at a time with [`Machine::process_event`]. Each call is synchronous:
//! the handler runs on the caller's thread and the result is known when the
//! call returns.
//!
//! Dispatch follows a fixed sequence:
//! 1. Reject events outside the normalized range
//! 2. Look up the transition tuple for the current state and event
//! 3. Treat a tuple without a handler as a quiet event
//! 4. Run the handler and act on its [`HandlerOutcome`](crate::core::HandlerOutcome)
//! 5. Resolve the next state, from the table or the handler's override
//! 6. Reject a next state outside the normalized range, else commit it

mod dispatch;
mod error;
mod machine;

pub use dispatch::Dispatch;
pub use error::FsmError;
pub use machine::{Machine, DEFAULT_NAME, MAX_NAME_LEN};
