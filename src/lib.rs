//! # Seating Library
//!
//! This library seats a fixed pool of players at 4-seat and 5-seat tables
//! for a game session, using the historical game log to avoid repeating
//! past pairings. It plans table counts, counts how often every pair of
//! players has already shared a table, and runs a randomized local search
//! for the seating with the fewest repeats.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]

pub mod constants;

pub mod history;
pub mod matrix;
pub mod optimizer;
pub mod partition;
pub mod planner;
pub mod record;
pub mod session;
pub mod stats;

pub use history::History;
pub use matrix::{MatchupMatrix, ScoreMatrix, build_frequency_matrix, build_score_matrix};
pub use optimizer::{Options, SeatingOptimizer, optimize_seating, partition_cost, table_cost};
pub use partition::{Seating, Table, partition_players};
pub use planner::{TableCounts, TableSize, plan_table_counts};
pub use record::{GameId, GameRecord, PlayerId};
pub use session::{Arrangement, Session};

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_from_reexports() {
        let players = (1..=8).map(PlayerId::new).collect::<Vec<_>>();
        let history = History::from(vec![
            GameRecord::new("g1", 1_u32, 0.0, 1),
            GameRecord::new("g1", 2_u32, 0.0, 2),
        ]);

        let counts = plan_table_counts(players.len());
        let matrix = build_frequency_matrix(&history, players.iter().copied());
        let initial = partition_players(&counts, &players).unwrap();
        let best = optimize_seating(&counts, &matrix, &players, &mut fastrand::Rng::with_seed(4))
            .unwrap();

        assert_eq!(partition_cost(&initial, &matrix), 1);
        assert_eq!(partition_cost(&best, &matrix), 0);
    }
}
