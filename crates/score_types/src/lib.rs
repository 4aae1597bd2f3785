//! Canonical serializable types for the scoreboard's remote store.
//!
//! Shared between `score_sync` (the client side of the push/pull protocol)
//! and `dev_store` (the local in-memory store). Field names follow the
//! spreadsheet endpoint's JSON, so unknown fields written by older clients
//! are ignored on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Version of the replicated state layout.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_innings() -> u32 {
    9
}

/// Full replicated game state, as stored under its game id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct WireState {
    /// Records written before versioning carry no tag and read as version 1.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub game_id: String,
    #[serde(default)]
    pub league_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_name: Option<String>,
    pub top_team_name: String,
    pub bottom_team_name: String,
    #[serde(default = "default_innings")]
    pub total_innings: u32,
    pub current_inning: u32,
    pub is_bottom_inning: bool,
    #[serde(default)]
    pub is_game_ended: bool,
    pub counts: WireCount,
    pub runners: WireRunners,
    pub score: WireScore,
    pub total_score: WireTotals,
    #[serde(default)]
    pub pitching: WirePitching,
    /// Monotonic per-writer revision of the state.
    #[serde(default)]
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct WireCount {
    pub ball: u8,
    pub strike: u8,
    pub out: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct WireRunners {
    pub base1: bool,
    pub base2: bool,
    pub base3: bool,
}

/// Runs per inning. JSON object keys are inning numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct WireScore {
    #[serde(default)]
    pub top: BTreeMap<u32, u32>,
    #[serde(default)]
    pub bottom: BTreeMap<u32, u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct WireTotals {
    pub top: u32,
    pub bottom: u32,
}

/// Pitch counts per appearance, keyed by the half being pitched to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct WirePitching {
    #[serde(default)]
    pub top: Vec<u32>,
    #[serde(default)]
    pub bottom: Vec<u32>,
}

/// Play-log entry appended to the remote audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct WireLogEntry {
    pub inning: u32,
    pub is_bottom: bool,
    pub team: String,
    pub play: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_name: Option<String>,
}

/// Form fields of a push (`POST <endpoint>`).
///
/// `state` and `log_data` carry JSON text, matching what the spreadsheet
/// endpoint reads from its form parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushForm {
    pub game_id: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_data: Option<String>,
}

/// Query parameters of `GET <endpoint>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_id: Option<String>,
}

pub const MODE_LEAGUES: &str = "getLeagues";
pub const MODE_TEAM_MASTER: &str = "getTeamMaster";
pub const MODE_GAMES_BY_LEAGUE: &str = "getGamesByLeague";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Reply to a push.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct PushResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PushResponse {
    pub fn success() -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// Body returned by reads that found nothing or failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ErrorPayload {
    pub error: String,
}

/// Entry of `mode=getLeagues`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct LeagueInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start: String,
}

/// Entry of `mode=getTeamMaster`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TeamInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberInfo>,
}

/// Roster member. Sheets hand back numbers for numeric cells, so every field
/// accepts either form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pos: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub default_order: String,
}

/// Entry of `mode=getGamesByLeague`, used to pick a game to resume.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_name: Option<String>,
    pub top_team: String,
    pub bottom_team: String,
    pub score: WireTotals,
    pub inning: u32,
    #[serde(default)]
    pub is_bottom: bool,
    #[serde(default)]
    pub is_finished: bool,
}

impl GameSummary {
    pub fn from_state(state: &WireState) -> Self {
        Self {
            id: state.game_id.clone(),
            league_name: state.league_name.clone(),
            top_team: state.top_team_name.clone(),
            bottom_team: state.bottom_team_name.clone(),
            score: state.total_score,
            inning: state.current_inning,
            is_bottom: state.is_bottom_inning,
            is_finished: state.is_game_ended,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
        Raw::Null => String::new(),
    })
}
