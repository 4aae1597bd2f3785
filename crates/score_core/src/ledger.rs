use crate::types::{Half, Inning};
use std::collections::BTreeMap;

/// Runs per half and inning, plus a running total per half.
///
/// Invariant: `total(half) == sum of every inning entry for that half`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    innings: [BTreeMap<Inning, u32>; 2],
    totals: [u32; 2],
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored parts. Fails with the first half whose
    /// total does not match its per-inning entries.
    pub fn from_parts(
        top: BTreeMap<Inning, u32>,
        bottom: BTreeMap<Inning, u32>,
        totals: [u32; 2],
    ) -> Result<Self, Half> {
        let ledger = Self {
            innings: [top, bottom],
            totals,
        };
        match ledger.inconsistent_half() {
            Some(half) => Err(half),
            None => Ok(ledger),
        }
    }

    /// Adds runs to an inning entry and the half's total. Zero runs is a no-op.
    pub fn add_runs(&mut self, half: Half, inning: Inning, runs: u32) {
        if runs == 0 {
            return;
        }
        *self.innings[half.index()].entry(inning).or_insert(0) += runs;
        self.totals[half.index()] += runs;
    }

    /// Ensures an entry exists so a scoreless half reads as 0 rather than blank.
    pub fn open_inning(&mut self, half: Half, inning: Inning) {
        self.innings[half.index()].entry(inning).or_insert(0);
    }

    pub fn runs(&self, half: Half, inning: Inning) -> Option<u32> {
        self.innings[half.index()].get(&inning).copied()
    }

    pub fn total(&self, half: Half) -> u32 {
        self.totals[half.index()]
    }

    pub fn innings(&self, half: Half) -> &BTreeMap<Inning, u32> {
        &self.innings[half.index()]
    }

    pub fn is_consistent(&self) -> bool {
        self.inconsistent_half().is_none()
    }

    fn inconsistent_half(&self) -> Option<Half> {
        Half::ALL.into_iter().find(|&half| {
            let sum: u64 = self.innings[half.index()]
                .values()
                .map(|&r| u64::from(r))
                .sum();
            sum != u64::from(self.totals[half.index()])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_runs_updates_inning_and_total() {
        let mut ledger = ScoreLedger::new();
        ledger.add_runs(Half::Top, 1, 2);
        ledger.add_runs(Half::Top, 3, 1);
        ledger.add_runs(Half::Bottom, 1, 4);

        assert_eq!(ledger.runs(Half::Top, 1), Some(2));
        assert_eq!(ledger.runs(Half::Top, 2), None);
        assert_eq!(ledger.total(Half::Top), 3);
        assert_eq!(ledger.total(Half::Bottom), 4);
        assert!(ledger.is_consistent());
    }

    #[test]
    fn zero_runs_does_not_create_entry() {
        let mut ledger = ScoreLedger::new();
        ledger.add_runs(Half::Bottom, 2, 0);
        assert_eq!(ledger.runs(Half::Bottom, 2), None);
    }

    #[test]
    fn open_inning_keeps_existing_runs() {
        let mut ledger = ScoreLedger::new();
        ledger.add_runs(Half::Top, 1, 2);
        ledger.open_inning(Half::Top, 1);
        ledger.open_inning(Half::Bottom, 1);
        assert_eq!(ledger.runs(Half::Top, 1), Some(2));
        assert_eq!(ledger.runs(Half::Bottom, 1), Some(0));
    }

    #[test]
    fn from_parts_rejects_bad_totals() {
        let mut top = BTreeMap::new();
        top.insert(1, 3);
        assert!(ScoreLedger::from_parts(top.clone(), BTreeMap::new(), [3, 0]).is_ok());
        assert_eq!(
            ScoreLedger::from_parts(top.clone(), BTreeMap::new(), [2, 0]),
            Err(Half::Top)
        );
        assert_eq!(
            ScoreLedger::from_parts(top, BTreeMap::new(), [3, 1]),
            Err(Half::Bottom)
        );
    }
}
