//! Normalized records built from Steam API responses.
//!
//! Upstream payloads are read into private `Raw*` shapes whose fields all
//! deserialize leniently: a missing, `null` or wrongly typed field falls
//! back to its default (empty string, zero, empty list or `None`), so
//! normalization never fails.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A player profile from `GetPlayerSummaries`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub steam_id: String,
    pub display_name: String,
    pub avatar_url: String,
    /// Epoch seconds.
    pub last_logoff: i64,
    /// 0 offline, 1 online, 2 busy, 3 away, 4 snooze, 5 looking to trade,
    /// 6 looking to play.
    pub persona_state: u8,
    /// Epoch seconds.
    pub created_at: i64,
}

/// Playtime counters in minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Playtime {
    pub total: u64,
    pub last_two_weeks: u64,
    pub windows: u64,
    pub mac: u64,
    pub linux: u64,
    pub handheld: u64,
}

/// A game in a user's library from `GetOwnedGames`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OwnedGame {
    pub app_id: String,
    pub playtime: Playtime,
    /// Epoch seconds.
    pub last_played_at: i64,
}

/// Store price. Every field is absent for free or unpriced apps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Price {
    pub currency: Option<String>,
    pub initial_cents: Option<i64>,
    pub final_cents: Option<i64>,
    pub discount_percent: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Screenshot {
    pub id: String,
    pub full_url: String,
}

/// Storefront details for one app.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppDetails {
    pub app_id: String,
    /// `"game"`, `"dlc"`, `"demo"`, ...
    pub kind: String,
    pub name: String,
    pub thumbnail_url: String,
    pub publishers: Vec<String>,
    pub developers: Vec<String>,
    pub price: Price,
    pub genres: Vec<Genre>,
    pub screenshots: Vec<Screenshot>,
}

// ---------------------------------------------------------------------------
// Upstream shapes
// ---------------------------------------------------------------------------

/// `{"response": ...}` wrapper used by the Web API.
#[derive(Debug, Default, Deserialize)]
#[serde(default, bound(deserialize = "T: DeserializeOwned + Default"))]
pub(crate) struct Envelope<T> {
    #[serde(deserialize_with = "lenient::or_default")]
    pub(crate) response: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Players {
    #[serde(deserialize_with = "lenient::list")]
    pub(crate) players: Vec<RawPlayer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Games {
    #[serde(deserialize_with = "lenient::list")]
    pub(crate) games: Vec<RawOwnedGame>,
}

/// One `<app_id>` entry of an app-details response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AppEntry {
    #[serde(deserialize_with = "lenient::object")]
    pub(crate) data: Option<RawAppDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPlayer {
    #[serde(deserialize_with = "lenient::id")]
    steamid: String,
    #[serde(deserialize_with = "lenient::string")]
    personaname: String,
    #[serde(deserialize_with = "lenient::string")]
    avatar: String,
    #[serde(deserialize_with = "lenient::int")]
    lastlogoff: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    personastate: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    timecreated: Option<i64>,
}

impl From<RawPlayer> for PlayerSummary {
    fn from(raw: RawPlayer) -> Self {
        Self {
            steam_id: raw.steamid,
            display_name: raw.personaname,
            avatar_url: raw.avatar,
            last_logoff: raw.lastlogoff.unwrap_or_default(),
            persona_state: raw
                .personastate
                .and_then(|v| u8::try_from(v).ok())
                .unwrap_or_default(),
            created_at: raw.timecreated.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawOwnedGame {
    #[serde(deserialize_with = "lenient::id")]
    appid: String,
    #[serde(deserialize_with = "lenient::int")]
    playtime_forever: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    playtime_2weeks: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    playtime_windows_forever: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    playtime_mac_forever: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    playtime_linux_forever: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    playtime_deck_forever: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    rtime_last_played: Option<i64>,
}

impl From<RawOwnedGame> for OwnedGame {
    fn from(raw: RawOwnedGame) -> Self {
        Self {
            app_id: raw.appid,
            playtime: Playtime {
                total: count(raw.playtime_forever),
                last_two_weeks: count(raw.playtime_2weeks),
                windows: count(raw.playtime_windows_forever),
                mac: count(raw.playtime_mac_forever),
                linux: count(raw.playtime_linux_forever),
                handheld: count(raw.playtime_deck_forever),
            },
            last_played_at: raw.rtime_last_played.unwrap_or_default(),
        }
    }
}

/// Non-negative counter; negatives clamp to zero.
fn count(value: Option<i64>) -> u64 {
    value.map_or(0, |v| v.max(0) as u64)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPrice {
    #[serde(deserialize_with = "lenient::opt_string")]
    currency: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    initial: Option<i64>,
    #[serde(rename = "final", deserialize_with = "lenient::int")]
    final_price: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    discount_percent: Option<i64>,
}

impl From<RawPrice> for Price {
    fn from(raw: RawPrice) -> Self {
        Self {
            currency: raw.currency,
            initial_cents: raw.initial,
            final_cents: raw.final_price,
            discount_percent: raw.discount_percent,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGenre {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    #[serde(deserialize_with = "lenient::string")]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScreenshot {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    #[serde(deserialize_with = "lenient::string")]
    path_full: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawAppDetails {
    #[serde(deserialize_with = "lenient::id")]
    steam_appid: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    kind: String,
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    capsule_image: String,
    #[serde(deserialize_with = "lenient::string_list")]
    publishers: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    developers: Vec<String>,
    #[serde(deserialize_with = "lenient::object")]
    price_overview: Option<RawPrice>,
    #[serde(deserialize_with = "lenient::list")]
    genres: Vec<RawGenre>,
    #[serde(deserialize_with = "lenient::list")]
    screenshots: Vec<RawScreenshot>,
}

impl AppDetails {
    /// Builds details from the `data` object of an app-details entry.
    ///
    /// `requested_id` is used when the payload lacks `steam_appid`.
    pub(crate) fn from_raw(raw: RawAppDetails, requested_id: &str) -> Self {
        let app_id = if raw.steam_appid.is_empty() {
            requested_id.to_string()
        } else {
            raw.steam_appid
        };

        Self {
            app_id,
            kind: raw.kind,
            name: raw.name,
            thumbnail_url: raw.capsule_image,
            publishers: raw.publishers,
            developers: raw.developers,
            price: raw.price_overview.map(Price::from).unwrap_or_default(),
            genres: raw
                .genres
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.description,
                })
                .collect(),
            screenshots: raw
                .screenshots
                .into_iter()
                .map(|s| Screenshot {
                    id: s.id,
                    full_url: s.path_full,
                })
                .collect(),
        }
    }
}

/// Field deserializers that never fail on a well-formed JSON value.
mod lenient {
    use serde::de::{DeserializeOwned, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    pub(super) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_string(d)?.unwrap_or_default())
    }

    pub(super) fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Identifiers arrive as strings (`steamid`) or numbers (`appid`).
    pub(super) fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    /// Integer from a JSON number or numeric string.
    pub(super) fn int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
                .or_else(|| n.as_f64().map(|v| v as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Strings of an array; other entries are skipped.
    pub(super) fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Entries of an array that parse as `T`; others are skipped.
    pub(super) fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// `T` when the value is an object, `None` otherwise.
    pub(super) fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(d)?;
        if !value.is_object() {
            return Ok(None);
        }
        Ok(serde_json::from_value(value).ok())
    }

    pub(super) fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(d)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }
}
