use chrono::{Local, NaiveDate};
use rand::Rng;
use std::fmt;

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 3;

/// Remote key of a game: `<league or "G">-<yyMMdd>-<3 base36 chars>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    /// New id for a game starting today.
    pub fn generate(league_id: Option<&str>) -> Self {
        Self::generate_with(league_id, Local::now().date_naive(), &mut rand::thread_rng())
    }

    pub fn generate_with(league_id: Option<&str>, date: NaiveDate, rng: &mut impl Rng) -> Self {
        let prefix = match league_id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => "G",
        };
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(format!("{prefix}-{}-{suffix}", date.format("%y%m%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
