//! Table count planning
//!
//! Decides how many 4-seat and 5-seat tables a session needs from nothing
//! more than its player count.

use enum_map::Enum;
use serde::{Deserialize, Serialize};

use crate::constants::table::{
    FIVE_SEATS, FOUR_SEATS, GENERAL_CASE_MIN_PLAYERS, UNSEATED_PLAYER_COUNT,
};

/// The two supported table shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize)]
pub enum TableSize {
    /// A table seating four players
    Four,
    /// A table seating five players
    Five,
}

impl TableSize {
    /// Returns the number of seats at a table of this size
    pub const fn seats(self) -> usize {
        match self {
            Self::Four => FOUR_SEATS,
            Self::Five => FIVE_SEATS,
        }
    }

    /// Maps a seat count back to a table size, if it is a supported one
    pub const fn from_seats(seats: usize) -> Option<Self> {
        match seats {
            FOUR_SEATS => Some(Self::Four),
            FIVE_SEATS => Some(Self::Five),
            _ => None,
        }
    }
}

/// Number of tables of each size needed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableCounts {
    /// Total number of tables reported by the plan
    pub total_tables: usize,
    /// Number of 4-seat tables
    pub four_seat_tables: usize,
    /// Number of 5-seat tables
    pub five_seat_tables: usize,
}

impl TableCounts {
    /// Returns the number of seats provided by the sized tables
    pub const fn seat_count(&self) -> usize {
        FOUR_SEATS * self.four_seat_tables + FIVE_SEATS * self.five_seat_tables
    }

    /// Checks whether these counts seat exactly `player_count` players
    pub const fn seats_exactly(&self, player_count: usize) -> bool {
        self.seat_count() == player_count
    }

    /// Returns the size of every table in seating order: all 4-seat tables
    /// first, then all 5-seat tables
    pub fn table_sizes(&self) -> impl Iterator<Item = TableSize> + use<> {
        std::iter::repeat_n(TableSize::Four, self.four_seat_tables)
            .chain(std::iter::repeat_n(TableSize::Five, self.five_seat_tables))
    }
}

/// Decides how many tables of each size a session of `player_count` needs
///
/// Sessions of fewer than 8 players get one table, sized only when the
/// count is exactly 4 or 5. A session of 11 players gets two unsized
/// tables. Every other count uses `count mod 4` five-seat tables and
/// fills the rest with four-seat tables, which always seats everyone.
///
/// The unsized cases are reported as-is; [`crate::partition`] rejects
/// them when asked to seat the players.
pub fn plan_table_counts(player_count: usize) -> TableCounts {
    if player_count < GENERAL_CASE_MIN_PLAYERS {
        let (four_seat_tables, five_seat_tables) = match player_count {
            FOUR_SEATS => (1, 0),
            FIVE_SEATS => (0, 1),
            _ => (0, 0),
        };
        TableCounts {
            total_tables: 1,
            four_seat_tables,
            five_seat_tables,
        }
    } else if player_count == UNSEATED_PLAYER_COUNT {
        TableCounts {
            total_tables: 2,
            four_seat_tables: 0,
            five_seat_tables: 0,
        }
    } else {
        let five_seat_tables = player_count % FOUR_SEATS;
        let total_tables = player_count / FOUR_SEATS;
        TableCounts {
            total_tables,
            four_seat_tables: total_tables - five_seat_tables,
            five_seat_tables,
        }
    }
}
