use score_core::{GameSetup, GameState, Outcome, PlayKind, TeamNames};
use score_host::{Command, CommandOutcome, Scorebook};
use score_sync::{
    spawn_pull_loop, MemoryRemote, NullSink, PullOutcome, RemoteStore, RenderSink, SkipReason,
    SyncConfig, SyncError, SyncHandle, SyncStatus,
};
use score_types::WireState;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const GAME_ID: &str = "L1-260301-ABC";

#[derive(Default)]
struct RecordingSink {
    renders: Mutex<Vec<GameState>>,
    statuses: Mutex<Vec<SyncStatus>>,
}

impl RecordingSink {
    fn statuses(&self) -> Vec<SyncStatus> {
        self.statuses.lock().unwrap().clone()
    }

    fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, state: &GameState) {
        self.renders.lock().unwrap().push(state.clone());
    }

    fn status(&self, status: &SyncStatus) {
        self.statuses.lock().unwrap().push(status.clone());
    }
}

fn setup() -> GameSetup {
    GameSetup {
        game_id: GAME_ID.into(),
        league_id: "L1".into(),
        league_name: Some("Spring League".into()),
        teams: TeamNames::new("Owls", "Foxes"),
        total_innings: 1,
    }
}

/// Recorder settings with the post-push cool-down disabled.
fn recorder() -> SyncConfig {
    SyncConfig {
        push_cooldown: Duration::ZERO,
        ..SyncConfig::recorder("http://127.0.0.1:8080/")
    }
}

fn viewer() -> SyncConfig {
    SyncConfig::viewer("http://127.0.0.1:8080/")
}

async fn registered(
    remote: &MemoryRemote,
    config: SyncConfig,
    sink: Arc<dyn RenderSink>,
) -> SyncHandle<MemoryRemote> {
    let handle = SyncHandle::new(remote.clone(), Scorebook::new(setup()), config, sink);
    handle.register().await.unwrap();
    handle
}

async fn play(handle: &SyncHandle<MemoryRemote>, outcome: Outcome) {
    let dispatch = handle.command(Command::Play(outcome)).await.unwrap();
    assert!(dispatch.is_synced(), "push failed: {:?}", dispatch.push);
}

async fn wait_until_pushing(handle: &SyncHandle<MemoryRemote>) {
    while !handle.is_pushing() {
        tokio::task::yield_now().await;
    }
}

async fn remote_state(remote: &MemoryRemote) -> WireState {
    remote.get(GAME_ID).await.expect("game stored")
}

#[tokio::test]
async fn registration_pushes_game_start() {
    let remote = MemoryRemote::new();
    let sink = Arc::new(RecordingSink::default());
    let handle = registered(&remote, recorder(), sink.clone()).await;

    let pushes = remote.pushes().await;
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].action.as_deref(), Some("game_start"));
    let log = pushes[0].log.as_ref().unwrap();
    assert_eq!(log.inning, 1);
    assert!(!log.is_bottom);
    assert_eq!(log.team, "Owls");
    assert_eq!(log.league_name.as_deref(), Some("Spring League"));

    assert_eq!(handle.play_log().await[0].kind, PlayKind::GameStart);
    assert_eq!(sink.render_count(), 1);
    assert_eq!(sink.statuses().last(), Some(&SyncStatus::Sent));
}

#[tokio::test]
async fn plays_push_full_state_with_action_and_log() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;

    play(&handle, Outcome::Ball).await;
    play(&handle, Outcome::Single).await;
    play(&handle, Outcome::HomeRun).await;

    let pushes = remote.pushes().await;
    let actions: Vec<Option<&str>> = pushes.iter().map(|p| p.action.as_deref()).collect();
    assert_eq!(
        actions,
        [Some("game_start"), None, Some("single"), Some("homerun")]
    );
    assert!(pushes[1].log.is_none());
    assert_eq!(pushes[3].log.as_ref().unwrap().play, "homerun");

    let stored = remote_state(&remote).await;
    assert_eq!(stored.total_score.top, 2);
    assert_eq!(stored.revision, handle.revision().await);
    assert!(pushes.windows(2).all(|w| w[0].state.revision < w[1].state.revision));
}

#[tokio::test(start_paused = true)]
async fn command_refused_while_push_in_flight() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;
    remote.set_latency(Duration::from_millis(500)).await;

    let first = tokio::spawn({
        let handle = handle.clone();
        async move { handle.command(Command::Play(Outcome::Single)).await }
    });
    wait_until_pushing(&handle).await;

    let second = handle.command(Command::Play(Outcome::Double)).await;
    assert!(matches!(second, Err(SyncError::Busy)));
    assert!(matches!(handle.undo().await, Err(SyncError::Busy)));

    let first = first.await.unwrap().unwrap();
    assert!(first.is_synced());
    assert!(!handle.is_pushing());

    // Exactly one single was recorded.
    let state = handle.state().await;
    assert!(state.runners.first);
    assert!(!state.runners.second);
    assert_eq!(handle.play_log().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn pull_while_pushing_leaves_state_unchanged() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;
    remote.set_latency(Duration::from_millis(500)).await;

    let push = tokio::spawn({
        let handle = handle.clone();
        async move { handle.command(Command::Play(Outcome::Walk)).await }
    });
    wait_until_pushing(&handle).await;

    let before = handle.state().await;
    let revision = handle.revision().await;
    assert_eq!(
        handle.pull().await.unwrap(),
        PullOutcome::Skipped(SkipReason::PushInFlight)
    );
    assert_eq!(handle.state().await, before);
    assert_eq!(handle.revision().await, revision);

    push.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn cooldown_holds_guard_after_push() {
    let remote = MemoryRemote::new();
    let handle = registered(
        &remote,
        SyncConfig::recorder("http://127.0.0.1:8080/"),
        Arc::new(NullSink),
    )
    .await;
    assert!(handle.is_pushing());
    tokio::time::sleep(Duration::from_millis(1001)).await;

    play(&handle, Outcome::Strike).await;
    assert!(handle.is_pushing());
    assert!(matches!(
        handle.command(Command::Play(Outcome::Strike)).await,
        Err(SyncError::Busy)
    ));

    tokio::time::sleep(Duration::from_millis(1001)).await;
    assert!(!handle.is_pushing());
    play(&handle, Outcome::Strike).await;
    assert_eq!(handle.state().await.count.strikes, 2);
}

#[tokio::test(start_paused = true)]
async fn suppression_window_blocks_pull_after_push() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;
    play(&handle, Outcome::Single).await;

    // Another device overwrote the record.
    let mut other = remote_state(&remote).await;
    other.top_team_name = "Hawks".into();
    other.revision = 50;
    remote.insert(other).await;

    assert_eq!(
        handle.pull().await.unwrap(),
        PullOutcome::Skipped(SkipReason::Suppressed)
    );
    assert_eq!(handle.state().await.teams.top, "Owls");

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(handle.pull().await.unwrap(), PullOutcome::Applied);
    assert_eq!(handle.state().await.teams.top, "Hawks");
    assert_eq!(handle.revision().await, 50);
    // History survives a pull.
    assert!(handle.can_undo().await);
}

#[tokio::test]
async fn push_failure_keeps_local_state() {
    let remote = MemoryRemote::new();
    let sink = Arc::new(RecordingSink::default());
    let handle = registered(&remote, recorder(), sink.clone()).await;
    remote.set_offline(true).await;

    let dispatch = handle
        .command(Command::Play(Outcome::Double))
        .await
        .unwrap();
    assert!(matches!(dispatch.push, Some(Err(SyncError::Offline))));
    assert!(matches!(dispatch.change, CommandOutcome::Applied(_)));
    assert!(handle.state().await.runners.second);
    assert!(!handle.is_pushing());
    assert!(sink
        .statuses()
        .iter()
        .any(|s| matches!(s, SyncStatus::SendFailed(_))));

    // The next push carries everything.
    remote.set_offline(false).await;
    play(&handle, Outcome::Ball).await;
    let stored = remote_state(&remote).await;
    assert!(stored.runners.base2);
    assert_eq!(stored.counts.ball, 1);
}

async fn attached_viewer(
    remote: &MemoryRemote,
    sink: Arc<dyn RenderSink>,
) -> SyncHandle<MemoryRemote> {
    SyncHandle::attach(remote.clone(), GAME_ID, viewer(), sink)
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn unsent_play_survives_scheduled_pull() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;
    tokio::time::sleep(Duration::from_secs(20)).await;

    remote.set_offline(true).await;
    let dispatch = handle
        .command(Command::Play(Outcome::Double))
        .await
        .unwrap();
    assert!(matches!(dispatch.push, Some(Err(SyncError::Offline))));
    remote.set_offline(false).await;

    assert_eq!(
        handle.pull().await.unwrap(),
        PullOutcome::Skipped(SkipReason::Unsent)
    );
    assert!(handle.state().await.runners.second);
    assert!(!remote_state(&remote).await.runners.base2);

    // The next successful push carries the double and pulls resume.
    play(&handle, Outcome::Ball).await;
    assert!(remote_state(&remote).await.runners.base2);
    tokio::time::sleep(Duration::from_secs(16)).await;
    assert_eq!(handle.pull().await.unwrap(), PullOutcome::Applied);
    let state = handle.state().await;
    assert!(state.runners.second);
    assert_eq!(state.count.balls, 1);
}

#[tokio::test(start_paused = true)]
async fn pull_result_arriving_after_a_local_play_is_discarded() {
    let remote = MemoryRemote::new();
    let config = SyncConfig {
        suppression_window: Duration::ZERO,
        ..recorder()
    };
    let handle = registered(&remote, config, Arc::new(NullSink)).await;
    remote.set_latency(Duration::from_secs(2)).await;

    let pulling = tokio::spawn({
        let handle = handle.clone();
        async move { handle.pull().await }
    });
    tokio::time::sleep(Duration::from_millis(500)).await;

    remote.set_latency(Duration::ZERO).await;
    play(&handle, Outcome::Single).await;
    let revision = handle.revision().await;

    assert_eq!(
        pulling.await.unwrap().unwrap(),
        PullOutcome::Skipped(SkipReason::Stale)
    );
    assert!(handle.state().await.runners.first);
    assert_eq!(handle.revision().await, revision);
}

#[tokio::test]
async fn viewer_cannot_register_over_the_recorder() {
    let remote = MemoryRemote::new();
    let recorder = registered(&remote, recorder(), Arc::new(NullSink)).await;
    play(&recorder, Outcome::HomeRun).await;

    let viewer = attached_viewer(&remote, Arc::new(NullSink)).await;
    assert!(matches!(viewer.register().await, Err(SyncError::ReadOnly)));
    assert!(!viewer.is_pushing());

    let pushes = remote.pushes().await;
    assert_eq!(pushes.len(), 2);
    assert_eq!(pushes.last().unwrap().action.as_deref(), Some("homerun"));
    assert_eq!(remote_state(&remote).await.total_score.top, 1);
}

#[tokio::test]
async fn push_stamps_local_update_time() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;
    play(&handle, Outcome::Single).await;

    let local = handle.state().await.updated_at_ms;
    let stored = remote_state(&remote).await.updated_at.unwrap();
    assert!(local > 0);
    assert_eq!(local, stored.timestamp_millis());
}

#[tokio::test]
async fn malformed_remote_state_is_rejected() {
    let remote = MemoryRemote::new();
    registered(&remote, recorder(), Arc::new(NullSink)).await;
    let handle = attached_viewer(&remote, Arc::new(NullSink)).await;

    let mut bad = remote_state(&remote).await;
    bad.total_score.bottom = 4;
    remote.insert(bad).await;

    let before = handle.state().await;
    assert!(matches!(
        handle.pull().await,
        Err(SyncError::InvalidState(_))
    ));
    assert_eq!(handle.state().await, before);
}

#[tokio::test]
async fn pull_failure_reports_waiting() {
    let remote = MemoryRemote::new();
    let sink = Arc::new(RecordingSink::default());
    registered(&remote, recorder(), Arc::new(NullSink)).await;
    let handle = attached_viewer(&remote, sink.clone()).await;
    remote.set_offline(true).await;

    assert!(matches!(handle.pull().await, Err(SyncError::Offline)));
    assert!(matches!(
        sink.statuses().last(),
        Some(SyncStatus::Waiting(_))
    ));
}

#[tokio::test]
async fn undo_pushes_restored_state() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;
    play(&handle, Outcome::HomeRun).await;
    assert_eq!(remote_state(&remote).await.total_score.top, 1);

    let dispatch = handle.undo().await.unwrap();
    assert!(dispatch.change);
    assert!(dispatch.is_synced());
    let pushes = remote.pushes().await;
    let last = pushes.last().unwrap();
    assert_eq!(last.action.as_deref(), Some("undo"));
    assert_eq!(last.state.total_score.top, 0);

    let nothing = handle.undo().await.unwrap();
    assert!(!nothing.change);
    assert!(nothing.push.is_none());
}

#[tokio::test]
async fn viewer_follows_recorder_until_the_end() {
    let remote = MemoryRemote::new();
    let recorder = registered(&remote, recorder(), Arc::new(NullSink)).await;
    let viewer = SyncHandle::attach(remote.clone(), GAME_ID, viewer(), Arc::new(NullSink))
        .await
        .unwrap();
    assert!(matches!(
        viewer.command(Command::Play(Outcome::Single)).await,
        Err(SyncError::ReadOnly)
    ));

    play(&recorder, Outcome::Triple).await;
    assert_eq!(viewer.pull().await.unwrap(), PullOutcome::Applied);
    assert!(viewer.state().await.runners.third);
    assert!(!viewer.should_stop());

    let end = recorder.command(Command::EndGame).await.unwrap();
    assert!(end.is_synced());
    assert!(recorder.is_ended());
    let pushes = remote.pushes().await;
    assert_eq!(pushes.last().unwrap().action.as_deref(), Some("game_end"));

    assert_eq!(viewer.pull().await.unwrap(), PullOutcome::Applied);
    assert!(viewer.state().await.ended);
    assert!(viewer.should_stop());
}

#[tokio::test]
async fn final_out_ends_game_and_refuses_plays() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;
    for _ in 0..6 {
        play(&handle, Outcome::Out).await;
    }

    let pushes = remote.pushes().await;
    let last = pushes.last().unwrap();
    assert_eq!(last.action.as_deref(), Some("game_end"));
    assert_eq!(last.log.as_ref().unwrap().play, "out");
    assert!(last.state.is_game_ended);
    assert!(handle.is_ended());

    let ignored = handle
        .command(Command::Play(Outcome::HomeRun))
        .await
        .unwrap();
    assert_eq!(ignored.change, CommandOutcome::Ignored);
    assert!(ignored.push.is_none());

    // Ending again only re-flushes the final record.
    let flushed = handle.command(Command::EndGame).await.unwrap();
    assert_eq!(flushed.change, CommandOutcome::Ignored);
    assert!(flushed.is_synced());
    assert_eq!(remote.pushes().await.len(), pushes.len() + 1);
    assert_eq!(remote_state(&remote).await.total_score.top, 0);
}

#[tokio::test]
async fn attach_to_missing_game_fails() {
    let remote = MemoryRemote::new();
    let result = SyncHandle::attach(remote, "G-000000-XYZ", viewer(), Arc::new(NullSink)).await;
    assert!(matches!(result, Err(SyncError::NotFound(id)) if id == "G-000000-XYZ"));
}

#[tokio::test(start_paused = true)]
async fn start_runs_pull_loop_even_when_registration_fails() {
    let remote = MemoryRemote::new();
    remote.set_offline(true).await;
    let sink = Arc::new(RecordingSink::default());

    let (handle, pull_loop) =
        SyncHandle::start(remote.clone(), setup(), recorder(), sink.clone()).await;
    assert!(sink
        .statuses()
        .iter()
        .any(|s| matches!(s, SyncStatus::RegistrationFailed(_))));

    remote.set_offline(false).await;
    tokio::time::sleep(Duration::from_secs(25)).await;
    assert!(!pull_loop.is_finished());
    assert!(matches!(
        sink.statuses().last(),
        Some(SyncStatus::Waiting(_))
    ));

    handle.request_shutdown();
    tokio::time::timeout(Duration::from_secs(30), pull_loop)
        .await
        .expect("pull loop stopped")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn viewer_pull_loop_stops_once_game_ends() {
    let remote = MemoryRemote::new();
    let recorder = registered(&remote, recorder(), Arc::new(NullSink)).await;
    let viewer = SyncHandle::attach(remote.clone(), GAME_ID, viewer(), Arc::new(NullSink))
        .await
        .unwrap();
    let pull_loop = spawn_pull_loop(viewer.clone());

    recorder.command(Command::EndGame).await.unwrap();
    tokio::time::timeout(Duration::from_secs(60), pull_loop)
        .await
        .expect("pull loop stopped")
        .unwrap();
    assert!(viewer.state().await.ended);
}

#[tokio::test]
async fn games_by_league_lists_unfinished_games() {
    let remote = MemoryRemote::new();
    let handle = registered(&remote, recorder(), Arc::new(NullSink)).await;
    play(&handle, Outcome::Single).await;

    let games = remote.games_by_league("L1").await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].id, GAME_ID);
    assert_eq!(games[0].top_team, "Owls");
    assert!(remote.games_by_league("L2").await.unwrap().is_empty());

    handle.command(Command::EndGame).await.unwrap();
    assert!(remote.games_by_league("L1").await.unwrap().is_empty());
}
