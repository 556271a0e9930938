use crate::error::{MfResult, MixForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Camelot wheel mode letter. A is minor, B is major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum KeyLetter {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CamelotKey {
    pub number: u8,
    pub letter: KeyLetter,
}

impl CamelotKey {
    pub fn new(number: u8, letter: KeyLetter) -> Option<Self> {
        (1..=12)
            .contains(&number)
            .then_some(Self { number, letter })
    }

    /// Lenient parse: returns `None` for anything that is not `1A`..`12B`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (split, _) = s.char_indices().last()?;
        let (num, letter) = s.split_at(split);
        let number = num.parse::<u8>().ok()?;
        let letter = KeyLetter::from_str(letter).ok()?;
        Self::new(number, letter)
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

impl FromStr for CamelotKey {
    type Err = MixForgeError;

    fn from_str(s: &str) -> MfResult<Self> {
        Self::parse(s)
            .ok_or_else(|| MixForgeError::Validation(format!("'{}' is not a Camelot key", s)))
    }
}

impl Serialize for CamelotKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CamelotKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One item of the ordering. Immutable for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    /// Stable identity key.
    pub path: String,
    pub key: Option<CamelotKey>,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// 1..=10, 0 when unknown.
    pub energy: u8,
    /// 0.0 when unknown.
    pub bpm: f64,
    /// Row/column in the pair cache. Dense `0..n`, assigned once per run.
    #[serde(skip)]
    pub index: usize,
}

impl Track {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn has_energy(&self) -> bool {
        self.energy > 0
    }
}

/// Assigns dense indices in list order. Any cache built before this call is stale.
pub fn assign_indices(tracks: &mut [Track]) {
    for (i, t) in tracks.iter_mut().enumerate() {
        t.index = i;
    }
}

/// Checks that every track's index equals its position.
pub fn check_indices(tracks: &[Track]) -> MfResult<()> {
    match tracks.iter().enumerate().find(|(i, t)| t.index != *i) {
        Some((pos, t)) => Err(MixForgeError::Validation(format!(
            "track '{}' at position {} carries index {}; indices must be dense and match list order",
            t.path, pos, t.index
        ))),
        None => Ok(()),
    }
}
