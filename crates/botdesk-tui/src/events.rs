//! UI event types.
//!
//! All external inputs (terminal, timers, collaborator replies, API results)
//! are converted to `UiEvent` before being processed by the reducer.
//!
//! ## Task Lifecycle Events
//!
//! Async work that the UI gates on uses a uniform lifecycle:
//! - The runtime emits `UiEvent::TaskStarted` once a task is actually spawned
//! - The runtime emits `UiEvent::TaskCompleted` with the result event when done
//! - The reducer is the only place that mutates `TaskState`

use botdesk_core::api::{ApiResult, Bot, BotData, CreatedBot, User};
use botdesk_core::collaborators::{Receipt, SettlementError};
use botdesk_core::payment::{Countdown, SessionId, SettlementTicket};
use botdesk_core::transcript::{AckRoute, LogEntry};
use crossterm::event::Event as CrosstermEvent;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

/// Results of bot manager API calls.
#[derive(Debug)]
pub enum ApiUiEvent {
    SessionChecked(ApiResult<Option<User>>),
    LoggedIn(ApiResult<User>),
    LoggedOut(ApiResult<()>),
    BotsLoaded(ApiResult<Vec<Bot>>),
    BotDataLoaded {
        bot_id: String,
        result: ApiResult<Option<BotData>>,
    },
    BotCreated {
        name: String,
        result: ApiResult<CreatedBot>,
    },
    BotRenamed {
        bot_id: String,
        name: String,
        result: ApiResult<()>,
    },
    BotDeleted {
        bot_id: String,
        result: ApiResult<()>,
    },
    TokenLoaded {
        bot_id: String,
        result: ApiResult<String>,
    },
}

/// Unified event enum for the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Frame tick (notice expiry, spinner).
    Tick,

    /// Terminal input event (key, resize).
    Terminal(CrosstermEvent),

    /// A thread or command acknowledgment arrived.
    AckArrived { route: AckRoute, reply: LogEntry },

    /// One second of a payment window elapsed.
    PaymentTick { session: SessionId },

    /// The runtime spawned the countdown for a session; the reducer takes ownership.
    CountdownStarted {
        session: SessionId,
        countdown: Countdown,
    },

    /// Payment settlement finished.
    Settled {
        ticket: SettlementTicket,
        result: Result<Receipt, SettlementError>,
    },

    Api(ApiUiEvent),

    /// Task lifecycle: runtime started a task (cancel token optional).
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },

    /// Task lifecycle: runtime completed a task (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
}
