//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O, timers and task spawning only (no direct UI mutations).
//!
//! Task-backed effects are created with `task: None`; the reducer stamps a
//! fresh `TaskId` on them before they leave `update`.
//!
//! Cancellation is initiated from the reducer via `UiEffect::CancelTask`.
//! The runtime executes it by calling `token.cancel()` on the provided token.

use botdesk_core::config::Theme;
use botdesk_core::payment::{SessionId, SettlementTicket};
use botdesk_core::transcript::PendingAck;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Ask the server whether a session cookie is still valid.
    CheckSession,

    Login {
        task: Option<TaskId>,
        username: String,
        password: String,
    },

    Logout,

    LoadBots { task: Option<TaskId> },

    LoadBotData { bot_id: String },

    CreateBot {
        task: Option<TaskId>,
        name: String,
        prefix: Option<String>,
    },

    RenameBot {
        task: Option<TaskId>,
        bot_id: String,
        name: String,
    },

    DeleteBot { task: Option<TaskId>, bot_id: String },

    FetchToken { bot_id: String },

    /// Ask the responder for the acknowledgment of a message or command.
    RequestAck(PendingAck),

    /// Spawn the one-second countdown for a payment session.
    StartCountdown { session: SessionId },

    /// Run the settlement for a confirmed payment.
    Settle { task: Option<TaskId>, ticket: SettlementTicket },

    /// Persist the theme preference to config.
    PersistTheme(Theme),

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
