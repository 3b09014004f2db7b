//! Command dispatch: runs one lookup and renders it as JSON.

use serde::Serialize;
use serde_json::Value;
use steamfetch_web::{Client, OwnedGame, PlayerSummary};

use crate::config::Config;

/// A single lookup to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Players { steam_ids: Vec<String> },
    Games { steam_id: String },
    App { app_id: String },
    Profile { steam_id: String },
}

/// Combined view of one user.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub player: Option<PlayerSummary>,
    pub games: Vec<OwnedGame>,
    pub game_count: usize,
}

impl Profile {
    pub fn new(players: Vec<PlayerSummary>, games: Vec<OwnedGame>) -> Self {
        Self {
            player: players.into_iter().next(),
            game_count: games.len(),
            games,
        }
    }
}

/// Builds the client from `config` and runs `command`.
pub async fn run(config: &Config, command: Command) -> anyhow::Result<Value> {
    let transport = config.transport.to_transport_config()?;
    let client = Client::with_config(&config.api_key, transport)?;
    execute(&client, config.country_code.as_deref(), command).await
}

pub async fn execute(
    client: &Client,
    country_code: Option<&str>,
    command: Command,
) -> anyhow::Result<Value> {
    let value = match command {
        Command::Players { steam_ids } => {
            let ids: Vec<&str> = steam_ids.iter().map(String::as_str).collect();
            serde_json::to_value(client.player_summaries(&ids).await?)?
        }
        Command::Games { steam_id } => serde_json::to_value(client.owned_games(&steam_id).await?)?,
        Command::App { app_id } => {
            serde_json::to_value(client.app_details(&app_id, country_code).await?)?
        }
        Command::Profile { steam_id } => {
            let ids = [steam_id.as_str()];
            let (players, games) = tokio::try_join!(
                client.player_summaries(&ids),
                client.owned_games(&steam_id),
            )?;
            let profile = Profile::new(players, games);
            tracing::info!(steam_id = %steam_id, games = profile.game_count, "profile fetched");
            serde_json::to_value(profile)?
        }
    };
    Ok(value)
}
