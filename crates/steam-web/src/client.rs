//! Steam domain client.
//!
//! Wraps one [`Transport`] for the Web API origin and one for the
//! storefront origin. Transport errors pass through unchanged; the client
//! adds no retry or suppression of its own.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::sleep::Sleeper;
use crate::transport::Transport;
use crate::types::{AppDetails, AppEntry, Envelope, Games, OwnedGame, PlayerSummary, Players};

/// Steam Web API origin.
pub const WEB_API_ORIGIN: &str = "https://api.steampowered.com";

/// Steam storefront origin.
pub const STORE_ORIGIN: &str = "https://store.steampowered.com";

const PLAYER_SUMMARIES_PATH: &str = "/ISteamUser/GetPlayerSummaries/v0002/";
const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v0001/";
const APP_DETAILS_PATH: &str = "/api/appdetails";

/// Steam API client.
///
/// Cheap to share behind a reference or `Arc`; calls do not block each other.
#[derive(Clone)]
pub struct Client {
    api_key: String,
    web: Transport,
    store: Transport,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("web", &self.web)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client with default transport settings.
    pub fn new(api_key: &str) -> Result<Self, TransportError> {
        Self::with_config(api_key, TransportConfig::default())
    }

    /// Creates a client, applying `config` to both transports.
    pub fn with_config(api_key: &str, config: TransportConfig) -> Result<Self, TransportError> {
        Self::with_origins(api_key, WEB_API_ORIGIN, STORE_ORIGIN, config)
    }

    /// Creates a client against custom origins.
    pub fn with_origins(
        api_key: &str,
        web_origin: &str,
        store_origin: &str,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(TransportError::Configuration(
                "API key must not be empty".into(),
            ));
        }

        Ok(Self {
            api_key: api_key.to_string(),
            web: Transport::new(web_origin, config.clone())?,
            store: Transport::new(store_origin, config)?,
        })
    }

    /// Replaces the retry delay primitive on both transports.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.web = self.web.with_sleeper(Arc::clone(&sleeper));
        self.store = self.store.with_sleeper(sleeper);
        self
    }

    /// Looks up player profiles for the given 64-bit Steam IDs.
    ///
    /// Returns an empty list when the response carries no players.
    pub async fn player_summaries(
        &self,
        steam_ids: &[&str],
    ) -> Result<Vec<PlayerSummary>, TransportError> {
        let ids = steam_ids.join(",");
        let body = self
            .web
            .get(
                PLAYER_SUMMARIES_PATH,
                &[("key", self.api_key.as_str()), ("steamids", ids.as_str())],
            )
            .await?;

        let players = players_from_envelope(body);
        debug!(requested = steam_ids.len(), found = players.len(), "player summaries");
        Ok(players)
    }

    /// Lists the games owned by `steam_id`.
    ///
    /// Returns an empty list when the response carries no games (for
    /// example, a private profile).
    pub async fn owned_games(&self, steam_id: &str) -> Result<Vec<OwnedGame>, TransportError> {
        let body = self
            .web
            .get(
                OWNED_GAMES_PATH,
                &[("key", self.api_key.as_str()), ("steamid", steam_id)],
            )
            .await?;

        let games = owned_games_from_envelope(body);
        debug!(steam_id, count = games.len(), "owned games");
        Ok(games)
    }

    /// Fetches storefront details for `app_id`, priced for `country_code`
    /// when given.
    ///
    /// Returns `Ok(None)` when the store has no page for the app.
    pub async fn app_details(
        &self,
        app_id: &str,
        country_code: Option<&str>,
    ) -> Result<Option<AppDetails>, TransportError> {
        let mut params = vec![("appids", app_id)];
        if let Some(cc) = country_code {
            params.push(("cc", cc));
        }

        let body = self.store.get(APP_DETAILS_PATH, &params).await?;

        let details = app_details_from_envelope(body, app_id);
        debug!(app_id, found = details.is_some(), "app details");
        Ok(details)
    }
}

/// `response.players[]`, empty when any level is missing.
fn players_from_envelope(body: Value) -> Vec<PlayerSummary> {
    let envelope: Envelope<Players> = serde_json::from_value(body).unwrap_or_default();
    envelope.response.players.into_iter().map(PlayerSummary::from).collect()
}

/// `response.games[]`, empty when any level is missing.
fn owned_games_from_envelope(body: Value) -> Vec<OwnedGame> {
    let envelope: Envelope<Games> = serde_json::from_value(body).unwrap_or_default();
    envelope.response.games.into_iter().map(OwnedGame::from).collect()
}

/// `<app_id>.data`, absent unless it is an object.
fn app_details_from_envelope(mut body: Value, app_id: &str) -> Option<AppDetails> {
    let entry = body.get_mut(app_id)?.take();
    let entry: AppEntry = serde_json::from_value(entry).ok()?;
    entry.data.map(|raw| AppDetails::from_raw(raw, app_id))
}
