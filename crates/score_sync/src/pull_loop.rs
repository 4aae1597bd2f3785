use crate::handle::SyncHandle;
use crate::remote::RemoteStore;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Run the scheduled pull for a game.
/// This function runs until the game is confirmed ended or shutdown is requested.
pub async fn run_pull_loop<R: RemoteStore>(handle: SyncHandle<R>) {
    let mut interval = interval(handle.config().pull_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The first tick completes immediately; the first pull waits a full period.
    interval.tick().await;

    loop {
        interval.tick().await;

        if handle.should_stop() {
            break;
        }

        if let Err(error) = handle.pull().await {
            debug!(game_id = handle.game_id(), %error, "scheduled pull failed");
        }

        if handle.should_stop() {
            break;
        }
    }

    info!(game_id = handle.game_id(), "pull loop stopped");
}

/// Spawn the pull loop as a tokio task.
pub fn spawn_pull_loop<R: RemoteStore>(handle: SyncHandle<R>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run_pull_loop(handle))
}
