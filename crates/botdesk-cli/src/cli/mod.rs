//! CLI entry and dispatch.

use anyhow::{Context, Result};
use botdesk_core::{config, logging};
use clap::Parser;

mod commands;

use commands::bots::Credentials;

#[derive(Parser)]
#[command(name = "botdesk")]
#[command(version)]
#[command(about = "Operator console for chat bots")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bot manager server URL (overrides api_base_url from config)
    #[arg(long, global = true, value_name = "URL", env = "BOTDESK_API_URL")]
    api_url: Option<String>,
}

/// Sign-in arguments for commands that talk to the bot manager.
#[derive(clap::Args, Debug, Clone, Default)]
struct AuthArgs {
    /// Username to sign in with
    #[arg(long, env = "BOTDESK_USERNAME")]
    username: Option<String>,

    /// Password to sign in with
    #[arg(long, env = "BOTDESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl From<AuthArgs> for Credentials {
    fn from(args: AuthArgs) -> Self {
        Credentials {
            username: args.username,
            password: args.password,
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive console (default)
    Console,
    /// Show the rental price for a number of days
    Price {
        /// Rental length in days
        #[arg(value_name = "DAYS")]
        days: String,
    },
    /// List the preset rental tiers
    Tiers,
    /// Query bots on the bot manager server
    Bots {
        #[command(subcommand)]
        command: BotCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum BotCommands {
    /// Lists your bots
    List {
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Prints a bot's token (masked unless --reveal)
    Token {
        /// The ID of the bot
        #[arg(value_name = "BOT_ID")]
        id: String,

        /// Print the full token
        #[arg(long)]
        reveal: bool,

        #[command(flatten)]
        auth: AuthArgs,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, api_url } = cli;

    match command {
        // Config commands must work even when the existing file is broken.
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
        None | Some(Commands::Console) => {
            let config = load_config(api_url)?;
            commands::console::run(&config).await
        }
        Some(Commands::Price { days }) => {
            load_config_for_command(api_url)?;
            commands::pricing::price(&days)
        }
        Some(Commands::Tiers) => {
            load_config_for_command(api_url)?;
            commands::pricing::tiers();
            Ok(())
        }
        Some(Commands::Bots { command }) => {
            let config = load_config_for_command(api_url)?;
            match command {
                BotCommands::List { auth } => commands::bots::list(&config, &auth.into()).await,
                BotCommands::Token { id, reveal, auth } => {
                    commands::bots::token(&config, &auth.into(), &id, reveal).await
                }
            }
        }
    }
}

fn load_config(api_url: Option<String>) -> Result<config::Config> {
    let mut config = config::Config::load().context("load config")?;
    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    Ok(config)
}

/// Loads config and sets up stderr logging for one-shot commands.
fn load_config_for_command(api_url: Option<String>) -> Result<config::Config> {
    let config = load_config(api_url)?;
    logging::init_stderr(&config);
    Ok(config)
}
