use crate::config::{Role, SyncConfig};
use crate::errors::SyncError;
use crate::pull_loop::spawn_pull_loop;
use crate::remote::{PushRequest, RemoteStore};
use crate::status::{RenderSink, SyncStatus};
use chrono::Utc;
use score_core::{GameSetup, GameState, PlayRecord};
use score_host::{from_wire, log_entry, to_wire, Command, CommandOutcome, Scorebook};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Push action tag of an undo.
pub const UNDO_ACTION: &str = "undo";

/// A local change and the push that carried it.
#[derive(Debug)]
pub struct Dispatch<T> {
    pub change: T,
    /// None when there was nothing to send.
    pub push: Option<Result<(), SyncError>>,
}

impl<T> Dispatch<T> {
    pub fn is_synced(&self) -> bool {
        matches!(self.push, Some(Ok(())))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullOutcome {
    /// Local state was replaced by the remote record.
    Applied,
    /// The store has no record for this game yet.
    Missing,
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    PushInFlight,
    /// Inside the suppression window after our own push.
    Suppressed,
    /// Local state changed while the pull was in flight.
    Stale,
    /// Local changes have not reached the store yet.
    Unsent,
}

struct SyncInner {
    book: Scorebook,
    last_push: Option<Instant>,
    /// Highest revision the store is known to hold.
    pushed_revision: u64,
}

/// Held for the duration of a push plus its cool-down.
struct InFlight {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Thread-safe handle to one synced game.
pub struct SyncHandle<R> {
    inner: Arc<Mutex<SyncInner>>,
    remote: Arc<R>,
    sink: Arc<dyn RenderSink>,
    config: Arc<SyncConfig>,
    game_id: Arc<str>,
    in_flight: Arc<AtomicBool>,
    /// Set once an ended state has been pushed or pulled.
    ended: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
}

impl<R> Clone for SyncHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            remote: Arc::clone(&self.remote),
            sink: Arc::clone(&self.sink),
            config: Arc::clone(&self.config),
            game_id: Arc::clone(&self.game_id),
            in_flight: Arc::clone(&self.in_flight),
            ended: Arc::clone(&self.ended),
            shutdown: Arc::clone(&self.shutdown),
        }
    }
}

impl<R: RemoteStore> SyncHandle<R> {
    pub fn new(
        remote: R,
        book: Scorebook,
        config: SyncConfig,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        let game_id = Arc::from(book.state().game_id.as_str());
        let pushed_revision = book.revision();
        Self {
            inner: Arc::new(Mutex::new(SyncInner {
                book,
                last_push: None,
                pushed_revision,
            })),
            remote: Arc::new(remote),
            sink,
            config: Arc::new(config),
            game_id,
            in_flight: Arc::new(AtomicBool::new(false)),
            ended: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts a new game: registers it with the store and spawns the pull
    /// loop. The loop runs even if registration fails.
    pub async fn start(
        remote: R,
        setup: GameSetup,
        config: SyncConfig,
        sink: Arc<dyn RenderSink>,
    ) -> (Self, JoinHandle<()>) {
        let handle = Self::new(remote, Scorebook::new(setup), config, sink);
        if handle.register().await.is_err() {
            info!(game_id = %handle.game_id, "game not registered, pull loop started anyway");
        }
        let pull_loop = spawn_pull_loop(handle.clone());
        (handle, pull_loop)
    }

    /// Joins an existing game, bypassing the suppression window.
    pub async fn attach(
        remote: R,
        game_id: &str,
        config: SyncConfig,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, SyncError> {
        let wire = timed(config.request_timeout, remote.fetch(game_id))
            .await?
            .ok_or_else(|| SyncError::NotFound(game_id.to_string()))?;
        let revision = wire.revision;
        let state = from_wire(wire)?;
        info!(game_id, role = ?config.role, revision, "attached to game");

        sink.render(&state);
        let ended = state.ended;
        let handle = Self::new(remote, Scorebook::resume(state, revision), config, sink);
        handle.ended.store(ended, Ordering::Release);
        Ok(handle)
    }

    /// Pushes the opening `game_start` record.
    pub async fn register(&self) -> Result<(), SyncError> {
        self.ensure_recorder()?;
        let permit = self.acquire()?;
        let request = {
            let mut inner = self.inner.lock().await;
            let record = inner.book.start();
            self.sink.render(inner.book.state());
            push_request(&mut inner.book, Some(record.kind.label()), Some(&record))
        };

        let result = self.send(request).await;
        if let Err(error) = &result {
            self.sink
                .status(&SyncStatus::RegistrationFailed(error.to_string()));
        }
        self.release_after_cooldown(permit);
        result
    }

    /// Applies a command locally and pushes the result.
    ///
    /// Refused with `SyncError::Busy` while the previous push (or its
    /// cool-down) is still in flight.
    pub async fn command(&self, command: Command) -> Result<Dispatch<CommandOutcome>, SyncError> {
        self.ensure_recorder()?;
        let permit = self.acquire().inspect_err(|_| {
            debug!(game_id = %self.game_id, ?command, "push in flight, command refused");
            self.sink.status(&SyncStatus::Busy);
        })?;

        let (outcome, request) = {
            let mut inner = self.inner.lock().await;
            let outcome = inner.book.apply(command);
            let request = match &outcome {
                CommandOutcome::Applied(applied) => {
                    self.sink.render(inner.book.state());
                    Some(push_request(
                        &mut inner.book,
                        applied.action,
                        applied.record.as_ref(),
                    ))
                }
                // Ending twice re-flushes the final record.
                CommandOutcome::Ignored if command == Command::EndGame => {
                    Some(push_request(&mut inner.book, None, None))
                }
                CommandOutcome::Ignored => None,
            };
            (outcome, request)
        };

        let push = match request {
            Some(request) => {
                let result = self.send(request).await;
                self.release_after_cooldown(permit);
                Some(result)
            }
            None => None,
        };
        Ok(Dispatch {
            change: outcome,
            push,
        })
    }

    /// Rolls back the last command and pushes the restored state.
    pub async fn undo(&self) -> Result<Dispatch<bool>, SyncError> {
        self.ensure_recorder()?;
        let permit = self.acquire().inspect_err(|_| {
            self.sink.status(&SyncStatus::Busy);
        })?;

        let request = {
            let mut inner = self.inner.lock().await;
            if inner.book.undo() {
                self.sink.render(inner.book.state());
                Some(push_request(&mut inner.book, Some(UNDO_ACTION), None))
            } else {
                None
            }
        };

        let undone = request.is_some();
        let push = match request {
            Some(request) => {
                let result = self.send(request).await;
                self.release_after_cooldown(permit);
                Some(result)
            }
            None => None,
        };
        Ok(Dispatch {
            change: undone,
            push,
        })
    }

    /// Replaces local state with the remote record.
    ///
    /// Skipped while a push is in flight, while local changes are unsent
    /// and, for recorders, inside the suppression window. A result that
    /// arrives after local state moved on is discarded.
    pub async fn pull(&self) -> Result<PullOutcome, SyncError> {
        if self.is_pushing() {
            debug!(game_id = %self.game_id, "push in flight, pull skipped");
            return Ok(PullOutcome::Skipped(SkipReason::PushInFlight));
        }

        let revision = {
            let inner = self.inner.lock().await;
            if let Some(last_push) = inner.last_push {
                if last_push.elapsed() < self.config.suppression_window {
                    debug!(game_id = %self.game_id, "inside suppression window, pull skipped");
                    return Ok(PullOutcome::Skipped(SkipReason::Suppressed));
                }
            }
            if inner.book.revision() > inner.pushed_revision {
                debug!(
                    game_id = %self.game_id,
                    local = inner.book.revision(),
                    pushed = inner.pushed_revision,
                    "unsent local changes, pull skipped"
                );
                return Ok(PullOutcome::Skipped(SkipReason::Unsent));
            }
            inner.book.revision()
        };

        let fetched = timed(self.config.request_timeout, self.remote.fetch(&self.game_id)).await;
        let wire = match fetched {
            Ok(Some(wire)) => wire,
            Ok(None) => {
                self.sink
                    .status(&SyncStatus::Waiting("no record yet".to_string()));
                return Ok(PullOutcome::Missing);
            }
            Err(error) => {
                warn!(game_id = %self.game_id, %error, "pull failed");
                self.sink.status(&SyncStatus::Waiting(error.to_string()));
                return Err(error);
            }
        };

        let remote_revision = wire.revision;
        let state = match from_wire(wire) {
            Ok(state) => state,
            Err(error) => {
                warn!(game_id = %self.game_id, %error, "malformed remote state ignored");
                self.sink.status(&SyncStatus::Waiting(error.to_string()));
                return Err(error.into());
            }
        };

        let mut inner = self.inner.lock().await;
        if self.is_pushing() {
            return Ok(PullOutcome::Skipped(SkipReason::PushInFlight));
        }
        if inner.book.revision() != revision {
            debug!(game_id = %self.game_id, "local state changed during pull, result discarded");
            return Ok(PullOutcome::Skipped(SkipReason::Stale));
        }

        let ended = state.ended;
        inner.book.replace(state, remote_revision);
        inner.pushed_revision = inner.book.revision();
        self.sink.render(inner.book.state());
        self.sink.status(&SyncStatus::Pulled);
        if ended && !self.ended.swap(true, Ordering::AcqRel) {
            info!(game_id = %self.game_id, "pulled final state");
        }
        debug!(game_id = %self.game_id, remote_revision, "pulled state applied");
        Ok(PullOutcome::Applied)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn is_pushing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// True once an ended state has been confirmed by a push or a pull.
    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }

    pub fn should_stop(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed) || self.is_ended()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub async fn state(&self) -> GameState {
        self.inner.lock().await.book.state().clone()
    }

    pub async fn revision(&self) -> u64 {
        self.inner.lock().await.book.revision()
    }

    pub async fn play_log(&self) -> Vec<PlayRecord> {
        self.inner.lock().await.book.log().to_vec()
    }

    pub async fn can_undo(&self) -> bool {
        self.inner.lock().await.book.can_undo()
    }

    fn ensure_recorder(&self) -> Result<(), SyncError> {
        match self.config.role {
            Role::Recorder => Ok(()),
            Role::Viewer => Err(SyncError::ReadOnly),
        }
    }

    fn acquire(&self) -> Result<InFlight, SyncError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight {
                flag: Arc::clone(&self.in_flight),
            })
            .map_err(|_| SyncError::Busy)
    }

    fn release_after_cooldown(&self, permit: InFlight) {
        let cooldown = self.config.push_cooldown;
        if cooldown.is_zero() {
            drop(permit);
            return;
        }
        tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            drop(permit);
        });
    }

    async fn send(&self, request: PushRequest) -> Result<(), SyncError> {
        self.sink.status(&SyncStatus::Sending);
        let action = request.action.as_deref().unwrap_or("-");
        let result = timed(self.config.request_timeout, self.remote.push(&request)).await;

        match &result {
            Ok(()) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.last_push = Some(Instant::now());
                    inner.pushed_revision = inner.pushed_revision.max(request.state.revision);
                }
                if request.state.is_game_ended {
                    self.ended.store(true, Ordering::Release);
                }
                debug!(
                    game_id = %self.game_id,
                    action,
                    revision = request.state.revision,
                    "pushed state"
                );
                self.sink.status(&SyncStatus::Sent);
            }
            Err(error) => {
                warn!(game_id = %self.game_id, action, %error, "push failed");
                self.sink.status(&SyncStatus::SendFailed(error.to_string()));
            }
        }
        result
    }
}

fn push_request(
    book: &mut Scorebook,
    action: Option<&str>,
    record: Option<&PlayRecord>,
) -> PushRequest {
    let now = Utc::now();
    book.stamp(now.timestamp_millis());
    let state = book.state();
    PushRequest {
        game_id: state.game_id.clone(),
        state: to_wire(state, book.revision(), now),
        action: action.map(str::to_string),
        log: record.map(|record| log_entry(record, state.league_name.as_deref())),
    }
}

async fn timed<T>(
    limit: Duration,
    request: impl Future<Output = Result<T, SyncError>>,
) -> Result<T, SyncError> {
    tokio::time::timeout(limit, request)
        .await
        .map_err(|_| SyncError::Timeout)?
}
