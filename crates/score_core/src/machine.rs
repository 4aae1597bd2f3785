//! Inning and game state machine.
//!
//! `TopHalf -> BottomHalf -> TopHalf (next inning) -> ... -> Ended`. The
//! machine owns every reset that happens on a half change, so the count and
//! runner models never clear themselves.

use crate::state::GameState;
use crate::types::{Half, Inning};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    TopHalf,
    BottomHalf,
    Ended,
}

/// Result of a completed half inning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Top half finished; bottom of the same inning starts.
    ToBottom { inning: Inning },
    /// Bottom half finished; top of the next inning starts.
    ToTop { inning: Inning },
    /// Bottom of the final scheduled inning finished.
    Ended,
}

/// Advances the game after the third out of a half inning.
pub fn half_complete(state: &mut GameState) -> Transition {
    if state.ended {
        return Transition::Ended;
    }

    let transition = match state.half {
        Half::Top => {
            state.half = Half::Bottom;
            Transition::ToBottom {
                inning: state.current_inning,
            }
        }
        Half::Bottom if state.current_inning >= state.total_innings => {
            state.ended = true;
            Transition::Ended
        }
        Half::Bottom => {
            state.current_inning += 1;
            state.half = Half::Top;
            Transition::ToTop {
                inning: state.current_inning,
            }
        }
    };

    reset_for_half(state);
    transition
}

/// Ends the game immediately. Returns false if it had already ended.
pub fn end_game(state: &mut GameState) -> bool {
    if state.ended {
        return false;
    }
    state.ended = true;
    reset_for_half(state);
    true
}

fn reset_for_half(state: &mut GameState) {
    state.count.reset();
    state.runners.clear();
    if !state.ended {
        state.score.open_inning(state.half, state.current_inning);
    }
}
