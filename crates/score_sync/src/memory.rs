use crate::errors::SyncError;
use crate::remote::{PushRequest, RemoteStore};
use score_types::{GameSummary, LeagueInfo, TeamInfo, WireState};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Number of most recent pushes kept for inspection.
pub const PUSH_LOG_CAPACITY: usize = 256;

#[derive(Default)]
struct MemoryInner {
    games: BTreeMap<String, WireState>,
    pushes: VecDeque<PushRequest>,
    leagues: Vec<LeagueInfo>,
    teams: Vec<TeamInfo>,
    offline: bool,
    latency: Duration,
}

/// In-process remote store for offline play and tests.
///
/// Clones share the same store, so a test can keep one clone to inspect what
/// a `SyncHandle` wrote.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with `SyncError::Offline`.
    pub async fn set_offline(&self, offline: bool) {
        self.inner.lock().await.offline = offline;
    }

    /// Delay applied to every call before it takes effect.
    pub async fn set_latency(&self, latency: Duration) {
        self.inner.lock().await.latency = latency;
    }

    /// Stores a record as if another device had pushed it.
    pub async fn insert(&self, state: WireState) {
        let mut inner = self.inner.lock().await;
        inner.games.insert(state.game_id.clone(), state);
    }

    pub async fn get(&self, game_id: &str) -> Option<WireState> {
        self.inner.lock().await.games.get(game_id).cloned()
    }

    /// The most recent accepted pushes, oldest first, up to
    /// `PUSH_LOG_CAPACITY`.
    pub async fn pushes(&self) -> Vec<PushRequest> {
        self.inner.lock().await.pushes.iter().cloned().collect()
    }

    pub async fn set_leagues(&self, leagues: Vec<LeagueInfo>) {
        self.inner.lock().await.leagues = leagues;
    }

    pub async fn set_teams(&self, teams: Vec<TeamInfo>) {
        self.inner.lock().await.teams = teams;
    }

    async fn ready(&self) -> Result<(), SyncError> {
        let (offline, latency) = {
            let inner = self.inner.lock().await;
            (inner.offline, inner.latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if offline {
            return Err(SyncError::Offline);
        }
        Ok(())
    }
}

impl RemoteStore for MemoryRemote {
    async fn push(&self, request: &PushRequest) -> Result<(), SyncError> {
        self.ready().await?;
        let mut inner = self.inner.lock().await;
        inner
            .games
            .insert(request.game_id.clone(), request.state.clone());
        if inner.pushes.len() == PUSH_LOG_CAPACITY {
            inner.pushes.pop_front();
        }
        inner.pushes.push_back(request.clone());
        Ok(())
    }

    async fn fetch(&self, game_id: &str) -> Result<Option<WireState>, SyncError> {
        self.ready().await?;
        Ok(self.inner.lock().await.games.get(game_id).cloned())
    }

    async fn leagues(&self) -> Result<Vec<LeagueInfo>, SyncError> {
        self.ready().await?;
        Ok(self.inner.lock().await.leagues.clone())
    }

    async fn team_master(&self) -> Result<Vec<TeamInfo>, SyncError> {
        self.ready().await?;
        Ok(self.inner.lock().await.teams.clone())
    }

    async fn games_by_league(&self, league_id: &str) -> Result<Vec<GameSummary>, SyncError> {
        self.ready().await?;
        let inner = self.inner.lock().await;
        Ok(inner
            .games
            .values()
            .filter(|state| state.league_id == league_id && !state.is_game_ended)
            .map(GameSummary::from_state)
            .collect())
    }
}
