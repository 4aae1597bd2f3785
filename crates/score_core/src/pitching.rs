use crate::types::Half;

/// Pitch counts per half, one entry per pitcher appearance.
///
/// A half is keyed by the half being pitched to, so the top half's entries
/// belong to the bottom team's pitchers. The last entry is the active pitcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PitcherUsage {
    appearances: [Vec<u32>; 2],
}

impl Default for PitcherUsage {
    fn default() -> Self {
        Self {
            appearances: [vec![0], vec![0]],
        }
    }
}

impl PitcherUsage {
    /// Empty sequences are treated as a single fresh appearance.
    pub fn from_parts(top: Vec<u32>, bottom: Vec<u32>) -> Self {
        let fill = |v: Vec<u32>| if v.is_empty() { vec![0] } else { v };
        Self {
            appearances: [fill(top), fill(bottom)],
        }
    }

    pub fn record_pitch(&mut self, half: Half) {
        let entries = &mut self.appearances[half.index()];
        match entries.last_mut() {
            Some(active) => *active += 1,
            None => entries.push(1),
        }
    }

    pub fn change_pitcher(&mut self, half: Half) {
        self.appearances[half.index()].push(0);
    }

    /// Pitch count of the active pitcher.
    pub fn active(&self, half: Half) -> u32 {
        self.appearances[half.index()].last().copied().unwrap_or(0)
    }

    pub fn appearances(&self, half: Half) -> &[u32] {
        &self.appearances[half.index()]
    }
}
