//! Play engine: maps a recorded outcome onto the game state.

use crate::count::{PitchKind, PitchResult};
use crate::machine::{self, Transition};
use crate::state::GameState;
use crate::types::{Half, Inning};
use std::fmt;
use std::str::FromStr;

/// A scorer input: a pitch or the result of a plate appearance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Strike,
    Ball,
    Foul,
    /// Fly or ground out; bypasses the ball/strike counters.
    Out,
    Single,
    Double,
    Triple,
    HomeRun,
    /// Explicit or intentional walk.
    Walk,
}

impl Outcome {
    pub const ALL: [Outcome; 9] = [
        Outcome::Strike,
        Outcome::Ball,
        Outcome::Foul,
        Outcome::Out,
        Outcome::Single,
        Outcome::Double,
        Outcome::Triple,
        Outcome::HomeRun,
        Outcome::Walk,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Strike => "strike",
            Outcome::Ball => "ball",
            Outcome::Foul => "foul",
            Outcome::Out => "out",
            Outcome::Single => "single",
            Outcome::Double => "double",
            Outcome::Triple => "triple",
            Outcome::HomeRun => "homerun",
            Outcome::Walk => "walk",
        }
    }

    /// Bases gained by the batter for hits.
    pub const fn hit_bases(self) -> Option<u8> {
        match self {
            Outcome::Single => Some(1),
            Outcome::Double => Some(2),
            Outcome::Triple => Some(3),
            Outcome::HomeRun => Some(4),
            _ => None,
        }
    }

    const fn pitch_kind(self) -> Option<PitchKind> {
        match self {
            Outcome::Strike => Some(PitchKind::Strike),
            Outcome::Ball => Some(PitchKind::Ball),
            Outcome::Foul => Some(PitchKind::Foul),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownOutcome(pub String);

impl fmt::Display for UnknownOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown outcome: {}", self.0)
    }
}

impl std::error::Error for UnknownOutcome {}

impl FromStr for Outcome {
    type Err = UnknownOutcome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let outcome = match lower.as_str() {
            "strike" | "k" => Outcome::Strike,
            "ball" | "b" => Outcome::Ball,
            "foul" | "f" => Outcome::Foul,
            "out" | "fly" | "ground" => Outcome::Out,
            "single" | "1b" => Outcome::Single,
            "double" | "2b" => Outcome::Double,
            "triple" | "3b" => Outcome::Triple,
            "homerun" | "hr" => Outcome::HomeRun,
            "walk" | "bb" | "ibb" => Outcome::Walk,
            _ => return Err(UnknownOutcome(s.to_string())),
        };
        Ok(outcome)
    }
}

/// Kind of an audited play-log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayKind {
    GameStart,
    Strikeout,
    Walk,
    Out,
    Single,
    Double,
    Triple,
    HomeRun,
    PitcherChange,
    GameEnd,
}

impl PlayKind {
    /// Label used as the push action and in the remote audit trail.
    pub const fn label(self) -> &'static str {
        match self {
            PlayKind::GameStart => "game_start",
            PlayKind::Strikeout => "strikeout",
            PlayKind::Walk => "walk",
            PlayKind::Out => "out",
            PlayKind::Single => "single",
            PlayKind::Double => "double",
            PlayKind::Triple => "triple",
            PlayKind::HomeRun => "homerun",
            PlayKind::PitcherChange => "pitcher_change",
            PlayKind::GameEnd => "game_end",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let kind = match label {
            "game_start" => PlayKind::GameStart,
            "strikeout" => PlayKind::Strikeout,
            "walk" => PlayKind::Walk,
            "out" => PlayKind::Out,
            "single" => PlayKind::Single,
            "double" => PlayKind::Double,
            "triple" => PlayKind::Triple,
            "homerun" => PlayKind::HomeRun,
            "pitcher_change" => PlayKind::PitcherChange,
            "game_end" => PlayKind::GameEnd,
            _ => return None,
        };
        Some(kind)
    }

    fn for_hit(bases: u8) -> Self {
        match bases {
            1 => PlayKind::Single,
            2 => PlayKind::Double,
            3 => PlayKind::Triple,
            _ => PlayKind::HomeRun,
        }
    }
}

/// Audit entry for a discrete scoring event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayRecord {
    pub inning: Inning,
    pub half: Half,
    pub batting_team: String,
    pub kind: PlayKind,
}

impl PlayRecord {
    /// Record stamped with the state's current inning and half.
    pub fn at(state: &GameState, kind: PlayKind) -> Self {
        Self {
            inning: state.current_inning,
            half: state.half,
            batting_team: state.batting_team().to_string(),
            kind,
        }
    }
}

/// Effect of one resolved outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub runs: u32,
    /// Present when the outcome ended a plate appearance.
    pub record: Option<PlayRecord>,
    pub transition: Option<Transition>,
}

/// Applies an outcome. Returns None when the game has already ended.
pub fn resolve(state: &mut GameState, outcome: Outcome) -> Option<Resolution> {
    if state.ended {
        return None;
    }

    let half = state.half;
    let inning = state.current_inning;
    let mut runs = 0;
    let mut kind = None;
    let mut half_over = false;

    // Every outcome except an explicit walk is a thrown pitch.
    if outcome != Outcome::Walk {
        state.pitching.record_pitch(half);
    }

    if let Some(pitch) = outcome.pitch_kind() {
        match state.count.record_pitch(pitch) {
            PitchResult::Counted | PitchResult::Ignored => {}
            PitchResult::Walk => {
                runs = walk(state);
                kind = Some(PlayKind::Walk);
            }
            PitchResult::Strikeout { half_complete } => {
                half_over = half_complete;
                kind = Some(PlayKind::Strikeout);
            }
        }
    } else if let Some(bases) = outcome.hit_bases() {
        let scored = state.runners.advance_on_hit(bases);
        runs = state.add_run(half, inning, scored);
        state.count.reset_batter();
        kind = Some(PlayKind::for_hit(bases));
    } else if outcome == Outcome::Out {
        state.count.reset_batter();
        half_over = state.count.record_out();
        kind = Some(PlayKind::Out);
    } else {
        state.count.reset_batter();
        runs = walk(state);
        kind = Some(PlayKind::Walk);
    }

    let record = kind.map(|kind| PlayRecord {
        inning,
        half,
        batting_team: state.teams.batting(half).to_string(),
        kind,
    });
    let transition = half_over.then(|| machine::half_complete(state));

    Some(Resolution {
        runs,
        record,
        transition,
    })
}

fn walk(state: &mut GameState) -> u32 {
    let scored = state.runners.force_walk();
    state.add_run(state.half, state.current_inning, scored)
}

/// Brings in a new pitcher for the current half.
pub fn change_pitcher(state: &mut GameState) -> Option<PlayRecord> {
    if state.ended {
        return None;
    }
    state.pitching.change_pitcher(state.half);
    Some(PlayRecord::at(state, PlayKind::PitcherChange))
}

/// Ends the game on request. Returns None if it had already ended.
pub fn end_game(state: &mut GameState) -> Option<PlayRecord> {
    let record = PlayRecord::at(state, PlayKind::GameEnd);
    machine::end_game(state).then_some(record)
}
