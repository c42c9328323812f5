//! Bot manager queries from the command line.

use anyhow::{Context, Result, anyhow};
use botdesk_core::api::{ApiClient, ApiError};
use botdesk_core::config::Config;
use botdesk_tui::common::mask_secret;

/// Sign-in for one-shot commands. The CLI keeps no session between runs.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

async fn signed_in_client(config: &Config, credentials: &Credentials) -> Result<ApiClient> {
    let api = ApiClient::from_config(config)?;
    match (&credentials.username, &credentials.password) {
        (Some(username), Some(password)) => {
            api.login(username, password)
                .await
                .with_context(|| format!("sign in as '{username}'"))?;
        }
        (None, None) => {}
        _ => anyhow::bail!("Pass both --username and --password"),
    }
    Ok(api)
}

fn api_failure(err: ApiError, action: &str) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow!(
            "{action}: not signed in. Pass --username and --password \
             (or set BOTDESK_USERNAME and BOTDESK_PASSWORD)"
        )
    } else {
        anyhow::Error::new(err).context(action.to_string())
    }
}

pub async fn list(config: &Config, credentials: &Credentials) -> Result<()> {
    let api = signed_in_client(config, credentials).await?;
    let bots = api
        .my_bots()
        .await
        .map_err(|err| api_failure(err, "list bots"))?;

    if bots.is_empty() {
        println!("No bots found.");
    } else {
        for bot in bots {
            println!("{}  {}  {}", bot.name, bot.id, bot.status.label());
        }
    }
    Ok(())
}

pub async fn token(config: &Config, credentials: &Credentials, id: &str, reveal: bool) -> Result<()> {
    let api = signed_in_client(config, credentials).await?;
    let token = api
        .bot_token(id)
        .await
        .map_err(|err| api_failure(err, &format!("fetch token for bot '{id}'")))?;

    if reveal {
        println!("{token}");
    } else {
        println!("{}", mask_secret(&token));
    }
    Ok(())
}
