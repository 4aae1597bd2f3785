pub mod config;
pub mod errors;
pub mod handle;
pub mod http;
pub mod memory;
pub mod pull_loop;
pub mod remote;
pub mod status;

pub use config::{Role, SyncConfig};
pub use errors::SyncError;
pub use handle::{Dispatch, PullOutcome, SkipReason, SyncHandle, UNDO_ACTION};
pub use http::HttpRemote;
pub use memory::MemoryRemote;
pub use pull_loop::{run_pull_loop, spawn_pull_loop};
pub use remote::{PushRequest, RemoteStore};
pub use status::{NullSink, RenderSink, SyncStatus};
