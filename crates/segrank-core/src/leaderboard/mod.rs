//! Per-feature leaderboards built from latent ratings.
//!
//! Every latent column is oriented against observed speeds, rescaled into
//! `[0, 100]` and ranked independently of the others. The functions here
//! only borrow their inputs, so concurrent calls over shared tables are fine.

pub mod engine;
pub mod orientation;
pub mod ranking;
pub mod scaling;

pub use self::engine::{compute, compute_column, scale_ratings};
pub use self::orientation::Orientation;

use crate::filters::OrientationFilters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};
use typed_builder::TypedBuilder;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum BoardType {
    Athlete,
    Segment,
}

impl BoardType {
    /// Sign applied before orientation. Athlete latent scales come out of
    /// the factorization pointing the opposite way from segment scales.
    pub fn direction(self) -> f64 {
        match self {
            BoardType::Athlete => -1.0,
            BoardType::Segment => 1.0,
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            BoardType::Athlete => "athlete_id",
            BoardType::Segment => "segment_id",
        }
    }

    pub fn from_id_column(s: &str) -> Option<Self> {
        match s {
            "athlete_id" => Some(BoardType::Athlete),
            "segment_id" => Some(BoardType::Segment),
            _ => None,
        }
    }
}

/// How many entries a leaderboard keeps. `0` and `"all"` both mean every
/// entity with a rating in the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BoardSize {
    Top(usize),
    All,
}

impl BoardSize {
    pub fn limit(self) -> Option<usize> {
        match self {
            BoardSize::Top(n) => Some(n),
            BoardSize::All => None,
        }
    }
}

impl From<usize> for BoardSize {
    fn from(n: usize) -> Self {
        if n == 0 {
            BoardSize::All
        } else {
            BoardSize::Top(n)
        }
    }
}

impl FromStr for BoardSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(BoardSize::All);
        }
        s.parse::<usize>()
            .map(BoardSize::from)
            .map_err(|_| format!("board size must be a number or 'all', got '{}'", s))
    }
}

impl TryFrom<String> for BoardSize {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BoardSize> for String {
    fn from(b: BoardSize) -> Self {
        b.to_string()
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardSize::Top(n) => write!(f, "{}", n),
            BoardSize::All => write!(f, "all"),
        }
    }
}

/// Everything one leaderboard computation depends on besides the tables.
#[derive(Debug, Clone, TypedBuilder)]
pub struct LeaderboardRequest {
    pub board_type: BoardType,
    #[builder(default = BoardSize::Top(20))]
    pub board_size: BoardSize,
    #[builder(default)]
    pub filters: OrientationFilters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub entity_id: u64,
    pub score: f64,
    pub average_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub board_type: BoardType,
    pub column: String,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn leader(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }
}

/// All leaderboards for one ratings table, in the table's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSet {
    pub board_type: BoardType,
    pub boards: Vec<Leaderboard>,
}

impl LeaderboardSet {
    pub fn get(&self, column: &str) -> Option<&Leaderboard> {
        self.boards.iter().find(|b| b.column == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.boards.iter().map(|b| b.column.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Leaderboard> {
        self.boards.iter()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_size_parsing() {
        assert_eq!("all".parse::<BoardSize>().unwrap(), BoardSize::All);
        assert_eq!("ALL".parse::<BoardSize>().unwrap(), BoardSize::All);
        assert_eq!("0".parse::<BoardSize>().unwrap(), BoardSize::All);
        assert_eq!("15".parse::<BoardSize>().unwrap(), BoardSize::Top(15));
        assert!("-3".parse::<BoardSize>().is_err());
        assert!("ten".parse::<BoardSize>().is_err());
    }

    #[test]
    fn test_board_size_serde() {
        let json = serde_json::to_string(&BoardSize::All).unwrap();
        assert_eq!(json, "\"all\"");
        let back: BoardSize = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(back, BoardSize::Top(12));
    }

    #[test]
    fn test_board_type_strings() {
        assert_eq!(BoardType::Athlete.to_string(), "athlete");
        assert_eq!("Segment".parse::<BoardType>().unwrap(), BoardType::Segment);
        assert_eq!(BoardType::Segment.id_column(), "segment_id");
        assert_eq!(BoardType::from_id_column("athlete_id"), Some(BoardType::Athlete));
    }
}
