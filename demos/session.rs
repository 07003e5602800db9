//! Session State Machine
//!
//! This example drives a protocol session through setup and teardown.
//!
//! Key concepts:
//! - Dense state and event enums declared with `state_ids!` / `event_ids!`
//! - One transition row per state, one tuple per event
//! - Handlers that count timeouts in a caller-owned context
//! - History and table dumps for diagnostics
//!
//! Run with: RUST_LOG=debug cargo run --example session

mod session_fsm;

use session_fsm::{Session, SessionConfig, SessionContext, SessionEvent, SessionTables};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Session State Machine ===\n");

    let tables = SessionTables::new();
    let mut session = Session::create(&tables)?;

    let config = SessionConfig { tmo_threshold: 3 };
    let mut ctx = SessionContext::default();

    let script = [
        SessionEvent::StartInit,
        SessionEvent::InitTmo,
        SessionEvent::InitTmo,
        SessionEvent::InitAck,
        SessionEvent::StartTerm,
        SessionEvent::TermAck,
    ];

    for event in script {
        session.engine(event, &config, &mut ctx)?;
        println!(
            "{:<28} -> {}",
            event.description(),
            session
                .machine
                .state_description(session.state_id())
                .unwrap_or("<unknown>")
        );
    }

    session.machine.print_history()?;
    session.machine.print_table()?;

    println!("=== Example Complete ===");
    Ok(())
}
