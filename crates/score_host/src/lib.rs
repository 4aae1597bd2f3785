pub mod errors;
pub mod ids;
pub mod scorebook;
pub mod wire;

pub use errors::{UnknownCommand, WireError};
pub use ids::GameId;
pub use scorebook::{Applied, Command, CommandOutcome, Scorebook};
pub use wire::{from_wire, log_entry, to_wire};
