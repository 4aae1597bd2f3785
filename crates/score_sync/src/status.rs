use score_core::GameState;
use std::fmt;

/// Sync state surfaced to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    Sending,
    Sent,
    SendFailed(String),
    RegistrationFailed(String),
    Pulled,
    /// Pull failed or the record is not there yet.
    Waiting(String),
    /// A command arrived while the previous push was in flight.
    Busy,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Sending => write!(f, "sending"),
            SyncStatus::Sent => write!(f, "sent"),
            SyncStatus::SendFailed(reason) => write!(f, "send failed: {reason}"),
            SyncStatus::RegistrationFailed(reason) => write!(f, "registration failed: {reason}"),
            SyncStatus::Pulled => write!(f, "up to date"),
            SyncStatus::Waiting(reason) => write!(f, "waiting: {reason}"),
            SyncStatus::Busy => write!(f, "busy, previous play still sending"),
        }
    }
}

/// Receives every state the sync engine wants drawn.
pub trait RenderSink: Send + Sync + 'static {
    fn render(&self, state: &GameState);
    fn status(&self, status: &SyncStatus);
}

/// Sink that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&self, _state: &GameState) {}
    fn status(&self, _status: &SyncStatus) {}
}
