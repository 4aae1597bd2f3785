//! In-memory implementation of the scoreboard's remote store.
//!
//! Serves the same contract as the spreadsheet endpoint:
//! - `POST /` form `gameId`, `state`, `action?`, `logData?` stores a game
//! - `GET /?gameId=` returns the stored state or `{error}`
//! - `GET /?mode=getLeagues|getTeamMaster|getGamesByLeague&leagueId=`

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use chrono::{DateTime, Utc};
use score_types::{
    ErrorPayload, GameSummary, LeagueInfo, PushForm, PushResponse, StoreQuery, TeamInfo,
    WireLogEntry, WireState, MODE_GAMES_BY_LEAGUE, MODE_LEAGUES, MODE_TEAM_MASTER,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

/// Initial catalog and games, loaded from a JSON file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub leagues: Vec<LeagueInfo>,
    #[serde(default)]
    pub teams: Vec<TeamInfo>,
    #[serde(default)]
    pub games: Vec<WireState>,
}

/// One accepted push, as the audit trail records it.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditEntry {
    pub game_id: String,
    pub action: Option<String>,
    pub log: Option<WireLogEntry>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Store {
    games: BTreeMap<String, WireState>,
    audit: Vec<AuditEntry>,
    leagues: Vec<LeagueInfo>,
    teams: Vec<TeamInfo>,
}

impl Store {
    pub fn from_seed(seed: Seed) -> Self {
        Self {
            games: seed
                .games
                .into_iter()
                .map(|state| (state.game_id.clone(), state))
                .collect(),
            audit: Vec::new(),
            leagues: seed.leagues,
            teams: seed.teams,
        }
    }

    pub fn game(&self, game_id: &str) -> Option<&WireState> {
        self.games.get(game_id)
    }

    pub fn audit(&self) -> &[AuditEntry] {
        &self.audit
    }

    fn accept(&mut self, form: PushForm) -> Result<(), String> {
        let state: WireState =
            serde_json::from_str(&form.state).map_err(|e| format!("invalid state: {e}"))?;
        if state.game_id != form.game_id {
            return Err(format!(
                "gameId {} does not match state {}",
                form.game_id, state.game_id
            ));
        }
        let log = form
            .log_data
            .as_deref()
            .map(serde_json::from_str::<WireLogEntry>)
            .transpose()
            .map_err(|e| format!("invalid logData: {e}"))?;

        if let Some(previous) = self.games.get(&form.game_id) {
            // Last writer wins; an older revision is only reported.
            if state.revision < previous.revision {
                warn!(
                    game_id = %form.game_id,
                    stored = previous.revision,
                    received = state.revision,
                    "push carries an older revision"
                );
            }
        } else {
            info!(game_id = %form.game_id, "new game registered");
        }

        self.audit.push(AuditEntry {
            game_id: form.game_id.clone(),
            action: form.action,
            log,
            received_at: Utc::now(),
        });
        self.games.insert(form.game_id, state);
        Ok(())
    }

    fn games_by_league(&self, league_id: &str) -> Vec<GameSummary> {
        self.games
            .values()
            .filter(|state| state.league_id == league_id && !state.is_game_ended)
            .map(GameSummary::from_state)
            .collect()
    }
}

pub type SharedStore = Arc<RwLock<Store>>;

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(read).post(write))
        .route("/exec", get(read).post(write))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

async fn write(State(store): State<SharedStore>, Form(form): Form<PushForm>) -> Json<PushResponse> {
    let game_id = form.game_id.clone();
    let action = form.action.clone();
    match store.write().await.accept(form) {
        Ok(()) => {
            debug!(%game_id, action = action.as_deref().unwrap_or("-"), "push stored");
            Json(PushResponse::success())
        }
        Err(message) => {
            warn!(%game_id, %message, "push rejected");
            Json(PushResponse::error(message))
        }
    }
}

async fn read(State(store): State<SharedStore>, Query(query): Query<StoreQuery>) -> Response {
    let store = store.read().await;
    match (query.mode.as_deref(), query.game_id.as_deref()) {
        (Some(MODE_LEAGUES), _) => Json(store.leagues.clone()).into_response(),
        (Some(MODE_TEAM_MASTER), _) => Json(store.teams.clone()).into_response(),
        (Some(MODE_GAMES_BY_LEAGUE), _) => match query.league_id.as_deref() {
            Some(league_id) => Json(store.games_by_league(league_id)).into_response(),
            None => error("leagueId is required"),
        },
        (Some(mode), _) => error(&format!("unknown mode {mode}")),
        (None, Some(game_id)) => match store.game(game_id) {
            Some(state) => Json(state.clone()).into_response(),
            None => error("game not found"),
        },
        (None, None) => error("gameId or mode is required"),
    }
}

fn error(message: &str) -> Response {
    Json(ErrorPayload {
        error: message.to_string(),
    })
    .into_response()
}
