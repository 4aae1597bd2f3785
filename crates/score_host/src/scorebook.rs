use crate::errors::UnknownCommand;
use score_core::engine::{self, Outcome, PlayKind, PlayRecord};
use score_core::{GameSetup, GameState, Half, HistoryStack, Transition};
use std::str::FromStr;
use tracing::{debug, info};

/// A scorer input mapped from the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Play(Outcome),
    ChangePitcher,
    EndGame,
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pitcher" | "change" => Ok(Command::ChangePitcher),
            "end" | "endgame" => Ok(Command::EndGame),
            other => other
                .parse::<Outcome>()
                .map(Command::Play)
                .map_err(|_| UnknownCommand(s.to_string())),
        }
    }
}

/// What a command did to the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    /// Push action tag. None for count-only changes.
    pub action: Option<&'static str>,
    pub record: Option<PlayRecord>,
    pub transition: Option<Transition>,
    pub runs: u32,
    pub revision: u64,
}

impl Applied {
    pub fn ended_game(&self) -> bool {
        self.transition == Some(Transition::Ended)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied(Applied),
    /// The game has ended; nothing changed.
    Ignored,
}

/// Owns one game's state and its undo history.
///
/// Every mutation goes through here: a snapshot is taken before the rules
/// run, and the revision advances whenever local state changes.
#[derive(Clone, Debug)]
pub struct Scorebook {
    state: GameState,
    history: HistoryStack,
    revision: u64,
    log: Vec<PlayRecord>,
}

impl Scorebook {
    pub fn new(setup: GameSetup) -> Self {
        Self::from_state(GameState::new(setup))
    }

    pub fn from_state(state: GameState) -> Self {
        Self::resume(state, 0)
    }

    /// Continues a game pulled from the store, with empty history.
    pub fn resume(state: GameState, revision: u64) -> Self {
        Self {
            state,
            history: HistoryStack::default(),
            revision,
            log: Vec::new(),
        }
    }

    /// Logs the opening record of a new game.
    pub fn start(&mut self) -> PlayRecord {
        let record = PlayRecord::at(&self.state, PlayKind::GameStart);
        info!(
            game_id = %self.state.game_id,
            top = %self.state.teams.top,
            bottom = %self.state.teams.bottom,
            "game started"
        );
        self.log.push(record.clone());
        record
    }

    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        if self.state.ended {
            debug!(?command, "game ended, command ignored");
            return CommandOutcome::Ignored;
        }

        self.history.snapshot_before_mutation(&self.state);

        let effect = match command {
            Command::Play(outcome) => engine::resolve(&mut self.state, outcome)
                .map(|r| (r.record, r.transition, r.runs)),
            Command::ChangePitcher => {
                engine::change_pitcher(&mut self.state).map(|r| (Some(r), None, 0))
            }
            Command::EndGame => engine::end_game(&mut self.state)
                .map(|r| (Some(r), Some(Transition::Ended), 0)),
        };
        let Some((record, transition, runs)) = effect else {
            self.history.discard_last();
            return CommandOutcome::Ignored;
        };

        self.revision += 1;
        if let Some(record) = &record {
            self.log.push(record.clone());
        }

        let action = if transition == Some(Transition::Ended) {
            info!(
                game_id = %self.state.game_id,
                top = self.state.score.total(Half::Top),
                bottom = self.state.score.total(Half::Bottom),
                "game ended"
            );
            Some(PlayKind::GameEnd.label())
        } else {
            record.as_ref().map(|r| r.kind.label())
        };

        CommandOutcome::Applied(Applied {
            action,
            record,
            transition,
            runs,
            revision: self.revision,
        })
    }

    /// Rolls back the last command. Returns false when there is nothing to
    /// undo or the game has ended.
    pub fn undo(&mut self) -> bool {
        if self.state.ended {
            debug!("game ended, undo ignored");
            return false;
        }
        if !self.history.undo(&mut self.state) {
            return false;
        }
        self.revision += 1;
        true
    }

    /// Wholesale-replaces the game with a pulled state. History is kept.
    pub fn replace(&mut self, state: GameState, remote_revision: u64) {
        self.state = state;
        self.revision = (self.revision + 1).max(remote_revision);
    }

    /// Records when the current state was last written to the store.
    /// Does not advance the revision.
    pub fn stamp(&mut self, at_ms: i64) {
        self.state.updated_at_ms = at_ms;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Every play record emitted so far, oldest first.
    pub fn log(&self) -> &[PlayRecord] {
        &self.log
    }

    pub fn can_undo(&self) -> bool {
        !self.state.ended && !self.history.is_empty()
    }

    pub fn is_ended(&self) -> bool {
        self.state.ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_core::{Runners, TeamNames};

    fn book(innings: u32) -> Scorebook {
        Scorebook::new(GameSetup {
            game_id: "G-260301-ABC".into(),
            teams: TeamNames::new("Owls", "Foxes"),
            total_innings: innings,
            ..GameSetup::default()
        })
    }

    fn applied(outcome: CommandOutcome) -> Applied {
        match outcome {
            CommandOutcome::Applied(applied) => applied,
            CommandOutcome::Ignored => panic!("command was ignored"),
        }
    }

    fn play(book: &mut Scorebook, outcome: Outcome) -> Applied {
        applied(book.apply(Command::Play(outcome)))
    }

    #[test]
    fn count_only_change_has_no_action() {
        let mut book = book(9);
        let applied = play(&mut book, Outcome::Ball);
        assert_eq!(applied.action, None);
        assert_eq!(applied.revision, 1);
        assert!(book.log().is_empty());
    }

    #[test]
    fn plate_appearance_is_logged() {
        let mut book = book(9);
        let applied = play(&mut book, Outcome::Double);
        assert_eq!(applied.action, Some("double"));
        assert_eq!(book.log().len(), 1);
        assert_eq!(book.log()[0].batting_team, "Owls");
    }

    #[test]
    fn foul_with_two_strikes_still_bumps_pitch_count() {
        let mut book = book(9);
        play(&mut book, Outcome::Strike);
        play(&mut book, Outcome::Strike);
        let applied = play(&mut book, Outcome::Foul);
        assert_eq!(applied.revision, 3);
        assert_eq!(book.state().count.strikes, 2);
        assert_eq!(book.state().pitching.active(Half::Top), 3);
    }

    #[test]
    fn undo_restores_and_advances_revision() {
        let mut book = book(9);
        play(&mut book, Outcome::Single);
        let before = book.state().clone();
        play(&mut book, Outcome::HomeRun);
        assert_eq!(book.state().totals(), (2, 0));

        assert!(book.undo());
        assert_eq!(book.state(), &before);
        assert_eq!(book.revision(), 3);
        assert!(book.undo());
        assert_eq!(book.state().runners, Runners::EMPTY);
        assert!(!book.undo());
    }

    #[test]
    fn final_out_pushes_game_end() {
        let mut book = book(1);
        for _ in 0..3 {
            play(&mut book, Outcome::Out);
        }
        play(&mut book, Outcome::Out);
        play(&mut book, Outcome::Out);
        let last = play(&mut book, Outcome::Out);

        assert!(last.ended_game());
        assert_eq!(last.action, Some("game_end"));
        assert_eq!(last.record.unwrap().kind, PlayKind::Out);
        assert!(book.is_ended());
        assert!(!book.can_undo());
        assert!(!book.undo());
        assert_eq!(book.apply(Command::Play(Outcome::Single)), CommandOutcome::Ignored);
        assert_eq!(book.apply(Command::EndGame), CommandOutcome::Ignored);
    }

    #[test]
    fn explicit_end_game() {
        let mut book = book(9);
        play(&mut book, Outcome::Single);
        let applied = applied(book.apply(Command::EndGame));
        assert_eq!(applied.action, Some("game_end"));
        assert_eq!(applied.record.unwrap().kind, PlayKind::GameEnd);
        assert_eq!(book.state().runners, Runners::EMPTY);
    }

    #[test]
    fn pitcher_change_is_logged() {
        let mut book = book(9);
        let applied = applied(book.apply(Command::ChangePitcher));
        assert_eq!(applied.action, Some("pitcher_change"));
        assert_eq!(book.state().pitching.appearances(Half::Top), &[0, 0]);
    }

    #[test]
    fn start_logs_game_start() {
        let mut book = book(9);
        let record = book.start();
        assert_eq!(record.kind, PlayKind::GameStart);
        assert_eq!(record.inning, 1);
        assert_eq!(record.batting_team, "Owls");
        assert_eq!(book.revision(), 0);
    }

    #[test]
    fn stamp_sets_push_time_without_new_revision() {
        let mut book = book(3);
        play(&mut book, Outcome::Single);
        let revision = book.revision();

        book.stamp(1_772_359_200_000);
        assert_eq!(book.state().updated_at_ms, 1_772_359_200_000);
        assert_eq!(book.revision(), revision);
    }

    #[test]
    fn replace_keeps_history_and_takes_remote_revision() {
        let mut book = book(9);
        play(&mut book, Outcome::Single);

        let mut remote = book.state().clone();
        remote.runners = Runners::LOADED;
        book.replace(remote.clone(), 10);
        assert_eq!(book.state(), &remote);
        assert_eq!(book.revision(), 10);

        book.replace(remote, 4);
        assert_eq!(book.revision(), 11);
        assert!(book.can_undo());
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            "HR".parse::<Command>(),
            Ok(Command::Play(Outcome::HomeRun))
        );
        assert_eq!("pitcher".parse::<Command>(), Ok(Command::ChangePitcher));
        assert_eq!(" End ".parse::<Command>(), Ok(Command::EndGame));
        assert_eq!(
            "bunt".parse::<Command>(),
            Err(UnknownCommand("bunt".to_string()))
        );
    }
}
