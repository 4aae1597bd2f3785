use score_core::{Half, Inning};
use std::fmt;

/// Error when converting a replicated state into a local game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Written under a schema version this build does not read.
    UnsupportedSchema { found: u32 },
    /// Record has no game id.
    MissingGameId,
    /// A counter holds a value that would already have been consumed.
    CountOutOfRange { balls: u8, strikes: u8, outs: u8 },
    /// Inning numbers are 1-based.
    InvalidInnings { total: Inning, current: Inning },
    /// A half's total does not equal the sum of its innings.
    InconsistentTotals { half: Half },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::UnsupportedSchema { found } => {
                write!(f, "unsupported schema version {found}")
            }
            WireError::MissingGameId => write!(f, "state has no game id"),
            WireError::CountOutOfRange {
                balls,
                strikes,
                outs,
            } => write!(
                f,
                "count out of range: {balls} balls, {strikes} strikes, {outs} outs"
            ),
            WireError::InvalidInnings { total, current } => {
                write!(f, "invalid innings: inning {current} of {total}")
            }
            WireError::InconsistentTotals { half } => {
                write!(f, "{half} total does not match its innings")
            }
        }
    }
}

impl std::error::Error for WireError {}

/// Error when parsing a scorer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command: {}", self.0)
    }
}

impl std::error::Error for UnknownCommand {}
