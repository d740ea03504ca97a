//! Positional table partitioning
//!
//! Splits an ordered player list into consecutive tables whose sizes come
//! from a [`TableCounts`] plan. The split never reorders players and never
//! looks at matchup history.

use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    planner::{TableCounts, TableSize},
    record::PlayerId,
};

/// Errors that can occur while splitting players into tables
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// There are no players to seat
    #[error("no players to seat")]
    NoPlayers,
    /// The table plan does not seat exactly the given players
    #[error("table plan seats {seat_count} players but {player_count} were given")]
    InputInconsistency {
        /// Number of players handed to the partitioner
        player_count: usize,
        /// Number of seats the table plan provides
        seat_count: usize,
    },
}

/// Players seated together at one table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table(Vec<PlayerId>);

impl Table {
    /// Returns the seated players in seat order
    pub fn players(&self) -> &[PlayerId] {
        &self.0
    }

    /// Returns the number of seated players
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if nobody is seated at this table
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the size of this table, if it is a supported one
    pub fn size(&self) -> Option<TableSize> {
        TableSize::from_seats(self.0.len())
    }

    /// Checks whether a player is seated at this table
    pub fn contains(&self, player: PlayerId) -> bool {
        self.0.contains(&player)
    }

    /// Iterates over every unordered pair of distinct seated players
    pub fn pairs(&self) -> impl Iterator<Item = (PlayerId, PlayerId)> + '_ {
        self.0.iter().copied().tuple_combinations()
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(", "))
    }
}

/// An assignment of a session's players to tables
///
/// Tables are ordered: every 4-seat table comes before every 5-seat table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seating {
    tables: Vec<Table>,
}

impl Seating {
    /// Returns the tables in order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Returns the number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Checks if the seating has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterates over all seated players, table by table and seat by seat
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.tables.iter().flat_map(|table| table.0.iter().copied())
    }

    /// Returns the number of seated players
    pub fn player_count(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }

    /// Flattens the seating back into one ordered player list
    pub fn flatten(&self) -> Vec<PlayerId> {
        self.players().collect_vec()
    }

    /// Returns a new seating in which the occupants of two flattened seat
    /// positions have traded places
    ///
    /// Table sizes are taken from `counts`, so the result has the same
    /// shape as `self` as long as `self` was built from the same counts.
    /// Swapping a position with itself yields an identical seating.
    ///
    /// # Errors
    ///
    /// Returns the partitioning error if `counts` no longer matches the
    /// seated players.
    ///
    /// # Panics
    ///
    /// Panics if either position is not below [`Self::player_count`].
    pub fn swapped(&self, counts: &TableCounts, a: usize, b: usize) -> Result<Self, Error> {
        let mut players = self.flatten();
        players.swap(a, b);
        partition_players(counts, &players)
    }
}

impl Display for Seating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, table) in self.tables.iter().enumerate() {
            writeln!(f, "Table {}: {table}", index + 1)?;
        }
        Ok(())
    }
}

/// Splits `players` into consecutive tables sized by `counts`
///
/// The first `4 * four_seat_tables` players fill the 4-seat tables in
/// groups of four; the rest fill the 5-seat tables in groups of five.
///
/// # Errors
///
/// * `Error::NoPlayers` - `players` is empty
/// * `Error::InputInconsistency` - `counts` does not provide exactly one
///   seat per player, as happens for the unsized plans of 6, 7 and 11
///   players
pub fn partition_players(counts: &TableCounts, players: &[PlayerId]) -> Result<Seating, Error> {
    if players.is_empty() {
        return Err(Error::NoPlayers);
    }
    if !counts.seats_exactly(players.len()) {
        return Err(Error::InputInconsistency {
            player_count: players.len(),
            seat_count: counts.seat_count(),
        });
    }

    let mut remaining = players;
    let tables = counts
        .table_sizes()
        .map(|size| {
            let (seated, rest) = remaining.split_at(size.seats());
            remaining = rest;
            Table(seated.to_vec())
        })
        .collect_vec();

    Ok(Seating { tables })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::planner::plan_table_counts;

    fn ids(range: std::ops::RangeInclusive<u32>) -> Vec<PlayerId> {
        range.map(PlayerId::new).collect()
    }

    fn table_values(seating: &Seating) -> Vec<Vec<u32>> {
        seating
            .tables()
            .iter()
            .map(|table| table.players().iter().map(|id| id.value()).collect())
            .collect()
    }

    #[test]
    fn test_partition_eight_sorted_players() {
        let players = ids(1..=8);
        let seating = partition_players(&plan_table_counts(8), &players).unwrap();

        assert_eq!(
            table_values(&seating),
            vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]
        );
    }

    #[test]
    fn test_partition_four_tables_before_five_tables() {
        let players = ids(1..=13);
        let seating = partition_players(&plan_table_counts(13), &players).unwrap();

        assert_eq!(
            table_values(&seating),
            vec![
                vec![1, 2, 3, 4],
                vec![5, 6, 7, 8],
                vec![9, 10, 11, 12, 13]
            ]
        );
        assert_eq!(seating.tables()[2].size(), Some(TableSize::Five));
    }

    #[test]
    fn test_partition_keeps_input_order() {
        let players = [5, 1, 4, 2, 3].map(PlayerId::new);
        let seating = partition_players(&plan_table_counts(5), &players).unwrap();

        assert_eq!(seating.flatten(), players.to_vec());
    }

    #[test]
    fn test_partition_preserves_players() {
        for player_count in (4..=60).filter(|&n| plan_table_counts(n).seats_exactly(n)) {
            let players = ids(1..=player_count as u32);
            let counts = plan_table_counts(player_count);
            let seating = partition_players(&counts, &players).unwrap();

            assert_eq!(seating.flatten(), players);
            assert_eq!(seating.len(), counts.total_tables);
            assert!(seating.tables().iter().all(|table| table.size().is_some()));
        }
    }

    #[test]
    fn test_partition_rejects_unsized_plans() {
        for player_count in [6, 7, 11] {
            let players = ids(1..=player_count);
            let result = partition_players(&plan_table_counts(player_count as usize), &players);

            assert_eq!(
                result,
                Err(Error::InputInconsistency {
                    player_count: player_count as usize,
                    seat_count: 0,
                })
            );
        }
    }

    #[test]
    fn test_partition_rejects_mismatched_counts() {
        let players = ids(1..=9);
        let result = partition_players(&plan_table_counts(8), &players);

        assert_eq!(
            result,
            Err(Error::InputInconsistency {
                player_count: 9,
                seat_count: 8,
            })
        );
    }

    #[test]
    fn test_partition_rejects_empty() {
        assert_eq!(
            partition_players(&plan_table_counts(0), &[]),
            Err(Error::NoPlayers)
        );
    }

    #[test]
    fn test_swapped_moves_players_between_tables() {
        let counts = plan_table_counts(8);
        let seating = partition_players(&counts, &ids(1..=8)).unwrap();
        let swapped = seating.swapped(&counts, 0, 7).unwrap();

        assert_eq!(
            table_values(&swapped),
            vec![vec![8, 2, 3, 4], vec![5, 6, 7, 1]]
        );
        assert_eq!(table_values(&seating)[0], vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_swapped_same_position_is_identity() {
        let counts = plan_table_counts(9);
        let seating = partition_players(&counts, &ids(1..=9)).unwrap();

        assert_eq!(seating.swapped(&counts, 4, 4).unwrap(), seating);
    }

    #[test]
    fn test_table_pairs() {
        let seating = partition_players(&plan_table_counts(4), &ids(1..=4)).unwrap();

        assert_eq!(seating.tables()[0].pairs().count(), 6);
        assert!(seating.tables()[0].contains(PlayerId::new(3)));
        assert!(!seating.tables()[0].contains(PlayerId::new(9)));
    }

    #[test]
    fn test_seating_display() {
        let seating = partition_players(&plan_table_counts(8), &ids(1..=8)).unwrap();

        assert_eq!(
            seating.to_string(),
            "Table 1: 1, 2, 3, 4\nTable 2: 5, 6, 7, 8\n"
        );
    }
}
