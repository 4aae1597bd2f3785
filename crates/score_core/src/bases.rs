/// Base occupancy for the current half inning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Runners {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl Runners {
    pub const EMPTY: Runners = Runners {
        first: false,
        second: false,
        third: false,
    };

    pub const LOADED: Runners = Runners {
        first: true,
        second: true,
        third: true,
    };

    fn as_array(self) -> [bool; 3] {
        [self.first, self.second, self.third]
    }

    fn from_array(bases: [bool; 3]) -> Self {
        Self {
            first: bases[0],
            second: bases[1],
            third: bases[2],
        }
    }

    pub fn occupied(&self) -> u32 {
        self.as_array().iter().filter(|&&b| b).count() as u32
    }

    pub fn is_loaded(&self) -> bool {
        self.first && self.second && self.third
    }

    pub fn clear(&mut self) {
        *self = Runners::EMPTY;
    }

    /// Advances every runner and the batter by `bases` (1..=4).
    /// Returns the runs scored.
    pub fn advance_on_hit(&mut self, bases: u8) -> u32 {
        debug_assert!((1..=4).contains(&bases));

        if bases >= 4 {
            let runs = self.occupied() + 1;
            self.clear();
            return runs;
        }

        let current = self.as_array();
        let mut next = [false; 3];
        let mut runs = 0;

        // Lead runner first so nobody is overwritten.
        for base in (0..3).rev() {
            if !current[base] {
                continue;
            }
            let target = base + bases as usize;
            if target >= 3 {
                runs += 1;
            } else {
                next[target] = true;
            }
        }
        next[bases as usize - 1] = true;

        *self = Runners::from_array(next);
        runs
    }

    /// Force-advance for a walk: a runner moves only when every base behind
    /// them is occupied. Returns 1 with the bases loaded, else 0.
    pub fn force_walk(&mut self) -> u32 {
        let runs = u32::from(self.is_loaded());
        if self.first && self.second {
            self.third = true;
        }
        if self.first {
            self.second = true;
        }
        self.first = true;
        runs
    }
}
