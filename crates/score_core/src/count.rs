//! Ball/strike/out counters for the current plate appearance and half inning.

pub const BALLS_FOR_WALK: u8 = 4;
pub const STRIKES_FOR_OUT: u8 = 3;
pub const OUTS_PER_HALF: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PitchKind {
    Ball,
    Strike,
    Foul,
}

/// What a single pitch resolved into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PitchResult {
    /// Ball or strike added to the count.
    Counted,
    /// Foul with two strikes; the count is unchanged.
    Ignored,
    /// Fourth ball. Balls and strikes are already reset; the caller advances runners.
    Walk,
    /// Third strike, consumed as exactly one out. Balls and strikes are reset.
    Strikeout { half_complete: bool },
}

/// Counters are never stored at their terminal value: a 4th ball, 3rd strike
/// or 3rd out is turned into a transition by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
    pub outs: u8,
}

impl Count {
    pub fn record_pitch(&mut self, kind: PitchKind) -> PitchResult {
        match kind {
            PitchKind::Ball => {
                if self.balls + 1 >= BALLS_FOR_WALK {
                    self.reset_batter();
                    PitchResult::Walk
                } else {
                    self.balls += 1;
                    PitchResult::Counted
                }
            }
            PitchKind::Strike => {
                if self.strikes + 1 >= STRIKES_FOR_OUT {
                    self.reset_batter();
                    let half_complete = self.record_out();
                    PitchResult::Strikeout { half_complete }
                } else {
                    self.strikes += 1;
                    PitchResult::Counted
                }
            }
            PitchKind::Foul => {
                // Fouls never produce the third strike.
                if self.strikes + 1 < STRIKES_FOR_OUT {
                    self.strikes += 1;
                    PitchResult::Counted
                } else {
                    PitchResult::Ignored
                }
            }
        }
    }

    /// Adds one out. Returns true when the half inning is complete.
    ///
    /// The out counter is left at 3 in that case; resetting the count and the
    /// bases belongs to the inning state machine.
    pub fn record_out(&mut self) -> bool {
        self.outs += 1;
        self.outs >= OUTS_PER_HALF
    }

    /// Clears balls and strikes at the end of a plate appearance.
    pub fn reset_batter(&mut self) {
        self.balls = 0;
        self.strikes = 0;
    }

    pub fn reset(&mut self) {
        *self = Count::default();
    }

    /// Whether every counter is within its storable range.
    pub fn is_valid(&self) -> bool {
        self.balls < BALLS_FOR_WALK && self.strikes < STRIKES_FOR_OUT && self.outs < OUTS_PER_HALF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_strike_is_one_out() {
        let mut count = Count {
            balls: 3,
            strikes: 2,
            outs: 1,
        };
        let result = count.record_pitch(PitchKind::Strike);
        assert_eq!(
            result,
            PitchResult::Strikeout {
                half_complete: false
            }
        );
        assert_eq!(
            count,
            Count {
                balls: 0,
                strikes: 0,
                outs: 2
            }
        );
    }

    #[test]
    fn third_strike_can_end_half() {
        let mut count = Count {
            balls: 0,
            strikes: 2,
            outs: 2,
        };
        assert_eq!(
            count.record_pitch(PitchKind::Strike),
            PitchResult::Strikeout {
                half_complete: true
            }
        );
    }

    #[test]
    fn foul_caps_at_two_strikes() {
        let mut count = Count::default();
        assert_eq!(count.record_pitch(PitchKind::Foul), PitchResult::Counted);
        assert_eq!(count.record_pitch(PitchKind::Foul), PitchResult::Counted);
        assert_eq!(count.record_pitch(PitchKind::Foul), PitchResult::Ignored);
        assert_eq!(count.strikes, 2);
        assert_eq!(count.outs, 0);
    }

    #[test]
    fn fourth_ball_resets_count() {
        let mut count = Count {
            balls: 3,
            strikes: 1,
            outs: 2,
        };
        assert_eq!(count.record_pitch(PitchKind::Ball), PitchResult::Walk);
        assert_eq!(count.balls, 0);
        assert_eq!(count.strikes, 0);
        assert_eq!(count.outs, 2);
    }
}
