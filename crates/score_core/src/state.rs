use crate::bases::Runners;
use crate::count::Count;
use crate::ledger::ScoreLedger;
use crate::machine::Phase;
use crate::pitching::PitcherUsage;
use crate::types::{Half, Inning, TeamNames};

pub const DEFAULT_INNINGS: Inning = 9;

/// Parameters for starting a new game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSetup {
    pub game_id: String,
    pub league_id: String,
    pub league_name: Option<String>,
    pub teams: TeamNames,
    pub total_innings: Inning,
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            game_id: String::new(),
            league_id: String::new(),
            league_name: None,
            teams: TeamNames::default(),
            total_innings: DEFAULT_INNINGS,
        }
    }
}

/// The full replicated state of one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub game_id: String,
    pub league_id: String,
    pub league_name: Option<String>,
    pub teams: TeamNames,
    pub total_innings: Inning,
    pub current_inning: Inning,
    pub half: Half,
    pub ended: bool,
    pub count: Count,
    pub runners: Runners,
    pub score: ScoreLedger,
    pub pitching: PitcherUsage,
    /// Unix milliseconds of the last push that carried this state.
    pub updated_at_ms: i64,
}

impl GameState {
    pub fn new(setup: GameSetup) -> Self {
        let mut score = ScoreLedger::new();
        score.open_inning(Half::Top, 1);
        Self {
            game_id: setup.game_id,
            league_id: setup.league_id,
            league_name: setup.league_name,
            teams: setup.teams,
            total_innings: setup.total_innings.max(1),
            current_inning: 1,
            half: Half::Top,
            ended: false,
            count: Count::default(),
            runners: Runners::default(),
            score,
            pitching: PitcherUsage::default(),
            updated_at_ms: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.ended {
            Phase::Ended
        } else {
            match self.half {
                Half::Top => Phase::TopHalf,
                Half::Bottom => Phase::BottomHalf,
            }
        }
    }

    pub fn batting_team(&self) -> &str {
        self.teams.batting(self.half)
    }

    /// Credits runs to a half inning. No-op once the game has ended.
    /// Returns the runs actually credited.
    pub fn add_run(&mut self, half: Half, inning: Inning, runs: u32) -> u32 {
        if self.ended || runs == 0 {
            return 0;
        }
        self.score.add_runs(half, inning, runs);
        runs
    }

    /// Runs for both teams, top first.
    pub fn totals(&self) -> (u32, u32) {
        (self.score.total(Half::Top), self.score.total(Half::Bottom))
    }
}
