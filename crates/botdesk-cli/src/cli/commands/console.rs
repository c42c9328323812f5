//! Interactive console command.

use anyhow::{Context, Result};
use botdesk_core::config::Config;
use botdesk_core::logging;

pub async fn run(config: &Config) -> Result<()> {
    // The console owns the terminal; logs go to a file instead.
    let _guard = logging::init_file(config).context("set up logging")?;
    tracing::info!(server = %config.api_base_url, "console starting");

    botdesk_tui::run_console(config)
        .await
        .context("console failed")?;

    tracing::info!("console closed");
    Ok(())
}
