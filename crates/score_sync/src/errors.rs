use hyper::StatusCode;
use score_host::WireError;
use thiserror::Error;

/// Failure of a push, pull or catalog query.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response: {0}")]
    Body(#[from] hyper::Error),

    #[error("failed to build request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("request timed out")]
    Timeout,

    #[error("remote store is offline")]
    Offline,

    #[error("remote rejected the request: {0}")]
    Rejected(String),

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid remote state: {0}")]
    InvalidState(#[from] WireError),

    #[error("game {0} not found")]
    NotFound(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("previous push still in flight")]
    Busy,

    #[error("viewers cannot record plays")]
    ReadOnly,
}

impl SyncError {
    /// Failures that the next sync cycle is expected to supersede.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SyncError::Transport(_)
                | SyncError::Body(_)
                | SyncError::Status(_)
                | SyncError::Timeout
                | SyncError::Offline
                | SyncError::Busy
        )
    }
}
