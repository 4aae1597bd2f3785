pub mod bases;
pub mod count;
pub mod engine;
pub mod history;
pub mod ledger;
pub mod machine;
pub mod pitching;
pub mod state;
pub mod types;

pub use bases::Runners;
pub use count::{Count, PitchKind, PitchResult};
pub use engine::{Outcome, PlayKind, PlayRecord, Resolution, UnknownOutcome};
pub use history::{HistoryStack, Snapshot, HISTORY_CAPACITY};
pub use ledger::ScoreLedger;
pub use machine::{Phase, Transition};
pub use pitching::PitcherUsage;
pub use state::{GameSetup, GameState, DEFAULT_INNINGS};
pub use types::{Half, Inning, TeamNames};
