//! Session establishment and teardown state machine.
//!
//! Shared by the `session` example and the session integration tests.

#![allow(dead_code)]

use tablefsm::core::{
    handler, EventDescription, HandlerOutcome, SharedHandler, StateDescription, StateRow,
    TransitionTuple,
};
use tablefsm::{event_ids, state_ids, BuildError, Dispatch, FsmError, Machine, MachineBuilder, StateId};
use tracing::{debug, error, warn};

state_ids! {
    pub enum SessionState {
        Idle => "Idle State",
        WaitInitAck => "Wait for Init Ack State",
        Established => "Established State",
        WaitTermAck => "Wait for Terminate Ack State",
    }
}

event_ids! {
    pub enum SessionEvent {
        StartInit => "Start Session Init",
        InitRcvd => "Session Init",
        InitTmo => "Session Init ACK TMO",
        InitAck => "Session Init ACK",
        StartTerm => "Start Session Termination",
        TermRcvd => "Session Terminate",
        TermAck => "Session Terminate ACK",
    }
}

/// Settings handed to every handler as the event payload.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub tmo_threshold: u32,
}

/// Per-session counters handlers update.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    pub timeout_count: u32,
}

type Row = StateRow<SessionConfig, SessionContext>;

fn start_init(_: &SessionConfig, _: &mut SessionContext) -> HandlerOutcome {
    debug!("start init");
    HandlerOutcome::ok()
}

fn init_rcvd(_: &SessionConfig, _: &mut SessionContext) -> HandlerOutcome {
    debug!("init received");
    HandlerOutcome::ok()
}

fn init_ack_rcvd(_: &SessionConfig, ctx: &mut SessionContext) -> HandlerOutcome {
    debug!("init ack received");
    ctx.timeout_count = 0;
    HandlerOutcome::ok()
}

/// Counts init timeouts. Reaching the threshold is reported but the session
/// keeps waiting for the ack.
fn init_ack_tmo(config: &SessionConfig, ctx: &mut SessionContext) -> HandlerOutcome {
    ctx.timeout_count += 1;
    if ctx.timeout_count >= config.tmo_threshold {
        warn!(
            count = ctx.timeout_count,
            threshold = config.tmo_threshold,
            "init timeouts exceeded"
        );
    } else {
        debug!(
            count = ctx.timeout_count,
            threshold = config.tmo_threshold,
            "init timeout"
        );
    }
    HandlerOutcome::ok()
}

fn start_term(_: &SessionConfig, _: &mut SessionContext) -> HandlerOutcome {
    debug!("start term");
    HandlerOutcome::ok()
}

fn term_rcvd(_: &SessionConfig, _: &mut SessionContext) -> HandlerOutcome {
    debug!("term received");
    HandlerOutcome::ok()
}

fn term_ack_rcvd(_: &SessionConfig, _: &mut SessionContext) -> HandlerOutcome {
    debug!("term ack received");
    HandlerOutcome::ok()
}

fn ignore(_: &SessionConfig, _: &mut SessionContext) -> HandlerOutcome {
    debug!("event ignored");
    HandlerOutcome::ok()
}

/// The three session tables. The machine borrows them, so they live here.
pub struct SessionTables {
    pub states: Vec<StateDescription>,
    pub events: Vec<EventDescription>,
    pub rows: Vec<Row>,
}

impl SessionTables {
    pub fn new() -> Self {
        use SessionEvent::*;
        use SessionState::*;

        let ignored: SharedHandler<SessionConfig, SessionContext> = handler(ignore);
        let skip = |event: SessionEvent, next: SessionState| {
            TransitionTuple::shared(event, &ignored, next)
        };

        let rows = vec![
            StateRow::new(
                Idle,
                vec![
                    TransitionTuple::new(StartInit, start_init, WaitInitAck),
                    TransitionTuple::new(InitRcvd, init_rcvd, Established),
                    skip(InitTmo, Idle),
                    skip(InitAck, Idle),
                    skip(StartTerm, Idle),
                    skip(TermRcvd, Idle),
                    skip(TermAck, Idle),
                ],
            ),
            StateRow::new(
                WaitInitAck,
                vec![
                    skip(StartInit, WaitInitAck),
                    skip(InitRcvd, WaitInitAck),
                    TransitionTuple::new(InitTmo, init_ack_tmo, WaitInitAck),
                    TransitionTuple::new(InitAck, init_ack_rcvd, Established),
                    TransitionTuple::new(StartTerm, term_rcvd, WaitInitAck),
                    TransitionTuple::new(TermRcvd, term_rcvd, Idle),
                    skip(TermAck, WaitInitAck),
                ],
            ),
            StateRow::new(
                Established,
                vec![
                    skip(StartInit, Established),
                    skip(InitRcvd, Established),
                    skip(InitTmo, Established),
                    skip(InitAck, Established),
                    TransitionTuple::new(StartTerm, start_term, WaitTermAck),
                    TransitionTuple::new(TermRcvd, term_rcvd, Idle),
                    skip(TermAck, Established),
                ],
            ),
            StateRow::new(
                WaitTermAck,
                vec![
                    skip(StartInit, WaitTermAck),
                    skip(InitRcvd, WaitTermAck),
                    skip(InitTmo, WaitTermAck),
                    skip(InitAck, WaitTermAck),
                    skip(StartTerm, WaitTermAck),
                    skip(TermRcvd, Idle),
                    TransitionTuple::new(TermAck, term_ack_rcvd, Idle),
                ],
            ),
        ];

        Self {
            states: SessionState::descriptions(),
            events: SessionEvent::descriptions(),
            rows,
        }
    }
}

impl Default for SessionTables {
    fn default() -> Self {
        Self::new()
    }
}

/// A session driven by the table machine.
pub struct Session<'t> {
    pub machine: Machine<'t, SessionConfig, SessionContext>,
}

impl<'t> Session<'t> {
    pub fn create(tables: &'t SessionTables) -> Result<Self, BuildError> {
        let machine = MachineBuilder::new()
            .name("Demo State Machine")
            .initial(SessionState::Idle)
            .states(&tables.states)
            .events(&tables.events)
            .table(&tables.rows)
            .build()?;
        Ok(Self { machine })
    }

    /// Feed one event, logging any failure.
    pub fn engine(
        &mut self,
        event: SessionEvent,
        config: &SessionConfig,
        ctx: &mut SessionContext,
    ) -> Result<Dispatch, FsmError> {
        let result = self.machine.process_event(event, config, ctx);
        if let Err(err) = &result {
            error!(?event, %err, "session state machine rejected event");
        }
        result
    }

    pub fn state(&self) -> Option<SessionState> {
        SessionState::from_id(self.machine.current_state())
    }

    pub fn state_id(&self) -> StateId {
        self.machine.current_state()
    }
}
