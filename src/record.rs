//! Identifiers and historical game rows
//!
//! A game log is a flat list of [`GameRecord`]s, one per seated player per
//! historical game. Rows belonging to the same game share a [`GameId`].

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Score earned by a player in a single game
pub type Score = f64;

/// Finishing position of a player in a single game (1 is best)
pub type Rank = u32;

/// A unique identifier for a player
///
/// Player IDs are sortable so that matchup matrices can be indexed by the
/// sorted set of a session's players.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::From,
)]
#[serde(transparent)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a player ID from its numeric value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the numeric value of this ID
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = ParseIntError;

    /// Parses a player ID from its decimal representation
    ///
    /// # Errors
    ///
    /// Returns a `ParseIntError` if the string is not a valid unsigned integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// An opaque identifier shared by every row of one historical game
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for GameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for GameId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the historical game log
///
/// Field names follow the tabular input format (`GameId`, `PlayerId`,
/// `Score`, `Rank`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameRecord {
    /// The game this row belongs to
    pub game_id: GameId,
    /// The player seated in that game
    pub player_id: PlayerId,
    /// Score the player earned in that game
    pub score: Score,
    /// Finishing position of the player in that game
    pub rank: Rank,
}

impl GameRecord {
    /// Creates a new record
    pub fn new(game_id: impl Into<GameId>, player_id: impl Into<PlayerId>, score: Score, rank: Rank) -> Self {
        Self {
            game_id: game_id.into(),
            player_id: player_id.into(),
            score,
            rank,
        }
    }
}
