//! Historical game log
//!
//! This module owns the list of [`GameRecord`]s that every other component
//! reads from. It provides the loaders for the tabular input format and the
//! grouped views used by the matrix builders and the statistics report.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    io::Read,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{GameId, GameRecord, PlayerId};

/// Errors that can occur while loading a game log
#[derive(Error, Debug)]
pub enum Error {
    /// The tabular input could not be read or a row failed to parse
    #[error("malformed csv history: {0}")]
    Csv(#[from] csv::Error),
    /// The JSON input could not be parsed
    #[error("malformed json history: {0}")]
    Json(#[from] serde_json::Error),
}

/// An ordered collection of historical game rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<GameRecord>,
}

impl From<Vec<GameRecord>> for History {
    fn from(records: Vec<GameRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<GameRecord> for History {
    fn from_iter<I: IntoIterator<Item = GameRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl History {
    /// Reads a game log in CSV form
    ///
    /// The input must start with a header row naming the `GameId`,
    /// `PlayerId`, `Score` and `Rank` columns, in any order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Csv` if the input cannot be read or any row fails
    /// to deserialize.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = reader
            .deserialize::<GameRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    /// Parses a game log from a JSON array of records
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the text is not a valid array of records.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns every record in input order
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// Returns the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks if the log holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keeps only the rows of the given players
    ///
    /// Games in which only some of the players took part keep just those
    /// players' rows.
    pub fn restricted_to(&self, players: &BTreeSet<PlayerId>) -> Self {
        self.records
            .iter()
            .filter(|record| players.contains(&record.player_id))
            .cloned()
            .collect()
    }

    /// Groups the records by game
    ///
    /// Within a game, records keep their input order.
    pub fn by_game(&self) -> BTreeMap<&GameId, Vec<&GameRecord>> {
        let mut games: BTreeMap<&GameId, Vec<&GameRecord>> = BTreeMap::new();
        for record in &self.records {
            games.entry(&record.game_id).or_default().push(record);
        }
        games
    }

    /// Groups the records by player
    pub fn by_player(&self) -> BTreeMap<PlayerId, Vec<&GameRecord>> {
        let mut players: BTreeMap<PlayerId, Vec<&GameRecord>> = BTreeMap::new();
        for record in &self.records {
            players.entry(record.player_id).or_default().push(record);
        }
        players
    }

    /// Returns the number of rows recorded for every game
    pub fn game_sizes(&self) -> HashMap<&GameId, usize> {
        self.records.iter().map(|record| &record.game_id).counts()
    }
}
