use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/";
pub const DEFAULT_PULL_INTERVAL: Duration = Duration::from_secs(10);
pub const MIN_PULL_INTERVAL: Duration = Duration::from_secs(5);
pub const MAX_PULL_INTERVAL: Duration = Duration::from_secs(30);

/// Whether this device records plays or only follows a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Recorder,
    Viewer,
}

/// Configuration for syncing one game against the remote store.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Base URL of the remote store.
    pub endpoint: String,
    pub role: Role,
    /// Period of the scheduled pull.
    pub pull_interval: Duration,
    /// Pulls are skipped for this long after a successful push.
    pub suppression_window: Duration,
    /// How long the in-flight guard stays held after a push completes.
    pub push_cooldown: Duration,
    pub request_timeout: Duration,
}

impl SyncConfig {
    pub fn recorder(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            role: Role::Recorder,
            pull_interval: DEFAULT_PULL_INTERVAL,
            suppression_window: Duration::from_secs(15),
            push_cooldown: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn viewer(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            role: Role::Viewer,
            pull_interval: DEFAULT_PULL_INTERVAL,
            suppression_window: Duration::ZERO,
            push_cooldown: Duration::ZERO,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the pull period, clamped to 5..=30 seconds.
    pub fn with_pull_interval(mut self, interval: Duration) -> Self {
        self.pull_interval = interval.clamp(MIN_PULL_INTERVAL, MAX_PULL_INTERVAL);
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::recorder(DEFAULT_ENDPOINT)
    }
}
