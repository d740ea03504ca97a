//! Session seating pipeline
//!
//! A [`Session`] bundles the players present today with the historical game
//! log and runs every stage needed to seat them: table planning, matchup
//! counting, positional partitioning and optimization.

use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::{
    constants::session::MAX_PLAYER_COUNT,
    history::History,
    matrix::{MatchupMatrix, ScoreMatrix, build_frequency_matrix, build_score_matrix},
    optimizer::{self, Cost, Options, SeatingOptimizer},
    partition::Seating,
    planner::{TableCounts, plan_table_counts},
    record::PlayerId,
    stats::{PlayerStats, player_stats},
};

/// Errors that can occur while seating a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A player was registered twice for the session
    #[error("player {0} is already in the session")]
    DuplicatePlayer(PlayerId),
    /// The session has reached the maximum number of players
    #[error("maximum number of players reached")]
    MaximumPlayers,
    /// Planning or optimizing the seating failed
    #[error(transparent)]
    Optimizer(#[from] optimizer::Error),
}

/// The seating chosen for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrangement {
    /// The table plan the seating follows
    pub counts: TableCounts,
    /// The chosen seating
    pub seating: Seating,
    /// Repeat-pairing cost of the chosen seating
    pub cost: Cost,
    /// Repeat-pairing cost of the sorted positional seating
    pub initial_cost: Cost,
}

/// Today's players together with the game log they are seated against
#[derive(Debug, Clone, Default)]
pub struct Session {
    players: BTreeSet<PlayerId>,
    history: History,
    options: Options,
}

impl Session {
    /// Creates a session with default optimizer options
    ///
    /// # Errors
    ///
    /// * `Error::DuplicatePlayer` - a player is listed twice
    /// * `Error::MaximumPlayers` - more players than a session allows
    pub fn new(
        players: impl IntoIterator<Item = PlayerId>,
        history: History,
    ) -> Result<Self, Error> {
        let mut session = Self {
            history,
            ..Self::default()
        };
        for player in players {
            session.add_player(player)?;
        }
        Ok(session)
    }

    /// Replaces the optimizer options used by [`Self::arrange`]
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Registers one more player for the session
    ///
    /// # Errors
    ///
    /// * `Error::DuplicatePlayer` - the player is already registered
    /// * `Error::MaximumPlayers` - the session is full
    pub fn add_player(&mut self, player: PlayerId) -> Result<(), Error> {
        if self.players.contains(&player) {
            return Err(Error::DuplicatePlayer(player));
        }
        if self.players.len() >= MAX_PLAYER_COUNT {
            return Err(Error::MaximumPlayers);
        }
        self.players.insert(player);
        Ok(())
    }

    /// Returns the registered players in ascending order
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().copied()
    }

    /// Returns the number of registered players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Returns the game log
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the table plan for the registered players
    pub fn table_counts(&self) -> TableCounts {
        plan_table_counts(self.players.len())
    }

    /// Builds the co-occurrence matrix of the registered players
    pub fn frequency_matrix(&self) -> MatchupMatrix {
        build_frequency_matrix(&self.history, self.players())
    }

    /// Builds the average score matrix of the registered players
    pub fn score_matrix(&self) -> ScoreMatrix {
        build_score_matrix(&self.history, self.players())
    }

    /// Computes per-player statistics for the registered players
    pub fn player_stats(&self) -> BTreeMap<PlayerId, PlayerStats> {
        player_stats(&self.history, self.players())
    }

    /// Seats the registered players
    ///
    /// The search starts from the players in ascending ID order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Optimizer` if the player count has no usable table
    /// plan (0, 1, 2, 3, 6, 7 or 11 players) or the options are invalid.
    pub fn arrange(&self, rng: &mut fastrand::Rng) -> Result<Arrangement, Error> {
        let counts = self.table_counts();
        if !counts.seats_exactly(self.players.len()) {
            warn!(
                "no table plan seats {} players (plan: {} tables, {} seats)",
                self.players.len(),
                counts.total_tables,
                counts.seat_count()
            );
        }

        let matrix = self.frequency_matrix();
        let players = self.players().collect::<Vec<_>>();
        let outcome = SeatingOptimizer::new(counts, &matrix)
            .with_options(self.options)?
            .optimize(&players, rng)?;

        info!(
            "arranged {} players at {} four-seat and {} five-seat tables",
            players.len(),
            counts.four_seat_tables,
            counts.five_seat_tables
        );

        Ok(Arrangement {
            counts,
            seating: outcome.seating,
            cost: outcome.cost,
            initial_cost: outcome.initial_cost,
        })
    }
}
