use crate::bases::Runners;
use crate::count::Count;
use crate::ledger::ScoreLedger;
use crate::pitching::PitcherUsage;
use crate::state::GameState;
use crate::types::{Half, Inning};
use std::collections::VecDeque;

/// Maximum number of undo levels kept.
pub const HISTORY_CAPACITY: usize = 20;

/// Deep copy of the mutable part of a game, taken before each command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub count: Count,
    pub runners: Runners,
    pub score: ScoreLedger,
    pub current_inning: Inning,
    pub half: Half,
    pub pitching: PitcherUsage,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            count: state.count,
            runners: state.runners,
            score: state.score.clone(),
            current_inning: state.current_inning,
            half: state.half,
            pitching: state.pitching.clone(),
        }
    }

    /// Overwrites the captured fields of `state`. Identity fields, team names
    /// and the ended flag are left untouched.
    pub fn restore(self, state: &mut GameState) {
        state.count = self.count;
        state.runners = self.runners;
        state.score = self.score;
        state.current_inning = self.current_inning;
        state.half = self.half;
        state.pitching = self.pitching;
    }
}

/// Bounded undo stack. Pushing past capacity evicts the oldest snapshot.
/// There is no redo.
#[derive(Clone, Debug)]
pub struct HistoryStack {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl HistoryStack {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Captures `state` before it is mutated.
    pub fn snapshot_before_mutation(&mut self, state: &GameState) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Snapshot::capture(state));
    }

    /// Rolls `state` back one step. Returns false when there is nothing to undo.
    pub fn undo(&mut self, state: &mut GameState) -> bool {
        match self.entries.pop_back() {
            Some(snapshot) => {
                snapshot.restore(state);
                true
            }
            None => false,
        }
    }

    /// Drops the most recent snapshot without applying it.
    pub fn discard_last(&mut self) {
        self.entries.pop_back();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
