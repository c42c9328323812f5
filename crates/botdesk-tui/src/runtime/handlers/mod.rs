//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return `UiEvent`. They perform I/O
//! and never touch state; the runtime spawns them and sends the result to
//! the inbox.
//!
//! ```ignore
//! // Handler: pure async, returns UiEvent
//! pub async fn load_bots(api: ApiClient) -> UiEvent { ... }
//!
//! // Runtime: spawns and sends to inbox
//! self.spawn_task(TaskKind::BotsLoad, task, false, move |_| handlers::load_bots(api));
//! ```

pub mod api;
pub mod collaborators;

pub use api::*;
pub use collaborators::*;
