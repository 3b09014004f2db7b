//! steamfetch entry point.

mod app;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::Command;

/// Looks up Steam players, libraries and store pages and prints JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Steam Web API key (overrides the config file).
    #[arg(long, env = "STEAM_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Country code for store prices (overrides the config file).
    #[arg(long = "cc", global = true)]
    country_code: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Player summaries for one or more Steam IDs.
    Players {
        #[arg(required = true)]
        steam_ids: Vec<String>,
    },
    /// Games owned by a Steam ID.
    Games { steam_id: String },
    /// Store details for an app.
    App { app_id: String },
    /// Player summary and owned games for one Steam ID.
    Profile { steam_id: String },
}

impl From<CliCommand> for Command {
    fn from(cmd: CliCommand) -> Self {
        match cmd {
            CliCommand::Players { steam_ids } => Command::Players { steam_ids },
            CliCommand::Games { steam_id } => Command::Games { steam_id },
            CliCommand::App { app_id } => Command::App { app_id },
            CliCommand::Profile { steam_id } => Command::Profile { steam_id },
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = config::Config::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge(cli.api_key, cli.country_code);

    let rt = tokio::runtime::Runtime::new()?;
    let output = rt.block_on(async {
        tokio::select! {
            res = app::run(&config, cli.command.into()) => res,
            _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("interrupted")),
        }
    })?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
