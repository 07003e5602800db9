//! Builder API for constructing state machines from caller tables.
//!
//! This module holds the table validator that every construction runs, a
//! fluent [`MachineBuilder`], and macros that declare dense state and event
//! enums so tables stay normalized by construction.

pub mod error;
pub mod machine;
pub mod macros;
pub mod validate;

pub use error::{BuildError, EventTableError, StateTableError};
pub use machine::MachineBuilder;
pub use validate::{diagnose_tables, validate_tables, TableCounts, MAX_NORMALIZED};
