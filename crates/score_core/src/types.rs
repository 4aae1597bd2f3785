/// Inning number, 1-based.
pub type Inning = u32;

/// Which team is at bat within an inning.
///
/// Top is the visiting (first-batting) team, bottom the home team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Half {
    #[default]
    Top,
    Bottom,
}

impl Half {
    pub const ALL: [Half; 2] = [Half::Top, Half::Bottom];

    /// Index into per-half arrays.
    pub const fn index(self) -> usize {
        match self {
            Half::Top => 0,
            Half::Bottom => 1,
        }
    }

    pub const fn is_bottom(self) -> bool {
        matches!(self, Half::Bottom)
    }

    pub const fn from_bottom(is_bottom: bool) -> Self {
        if is_bottom {
            Half::Bottom
        } else {
            Half::Top
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Half::Top => "top",
            Half::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for Half {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display names of both teams.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamNames {
    pub top: String,
    pub bottom: String,
}

impl TeamNames {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
        }
    }

    /// Name of the team batting in the given half.
    pub fn batting(&self, half: Half) -> &str {
        match half {
            Half::Top => &self.top,
            Half::Bottom => &self.bottom,
        }
    }
}

impl Default for TeamNames {
    fn default() -> Self {
        Self::new("Visitors", "Home")
    }
}
