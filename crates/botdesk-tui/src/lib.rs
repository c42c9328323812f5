//! Full-screen operator console for botdesk.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod interrupt;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use botdesk_core::config::Config;
use botdesk_core::payment::SessionState;
pub use runtime::TuiRuntime;

/// Runs the interactive console until the operator quits.
///
/// # Errors
/// Returns an error if stderr is not a terminal or the terminal fails.
pub async fn run_console(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The console requires a terminal.\n\
             Use `botdesk bots list` or `botdesk price <DAYS>` for non-interactive use."
        );
    }

    let mut err = stderr();
    writeln!(err, "botdesk console")?;
    writeln!(err, "Server: {}", config.api_base_url)?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(config.clone())?;
    runtime.run()?;
    let confirmed = runtime
        .state
        .tui
        .checkout
        .session()
        .filter(|s| s.state() == SessionState::Confirmed)
        .map(|s| s.reference());
    drop(runtime);

    if let Some(reference) = confirmed {
        writeln!(err, "Last payment confirmed: {reference}")?;
    }
    writeln!(err, "Goodbye!")?;
    Ok(())
}
