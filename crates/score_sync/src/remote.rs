use crate::errors::SyncError;
use score_types::{GameSummary, LeagueInfo, TeamInfo, WireLogEntry, WireState};
use std::future::Future;

/// One create-or-replace write keyed by game id.
#[derive(Clone, Debug, PartialEq)]
pub struct PushRequest {
    pub game_id: String,
    pub state: WireState,
    pub action: Option<String>,
    pub log: Option<WireLogEntry>,
}

/// The authoritative store every device syncs against.
pub trait RemoteStore: Send + Sync + 'static {
    fn push(&self, request: &PushRequest) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Latest record for a game. `Ok(None)` when the store has none.
    fn fetch(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<Option<WireState>, SyncError>> + Send;

    fn leagues(&self) -> impl Future<Output = Result<Vec<LeagueInfo>, SyncError>> + Send;

    fn team_master(&self) -> impl Future<Output = Result<Vec<TeamInfo>, SyncError>> + Send;

    /// In-progress games of a league.
    fn games_by_league(
        &self,
        league_id: &str,
    ) -> impl Future<Output = Result<Vec<GameSummary>, SyncError>> + Send;
}
