//! Seating optimization
//!
//! This module searches for a seating with as few repeat pairings as
//! possible. The search is a greedy hill climb with reversion: every
//! iteration swaps two random seats of the best seating found so far and
//! keeps the result only if it is strictly cheaper.

use std::collections::HashSet;

use garde::Validate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::{Duration, Instant};

use crate::{
    constants::optimizer::{
        DEFAULT_ITERATION_EXPONENT, DEFAULT_RESTARTS, MAX_ITERATION_EXPONENT, MAX_RESTARTS,
        MIN_ITERATION_EXPONENT,
    },
    matrix::MatchupMatrix,
    partition::{self, Seating, Table, partition_players},
    planner::TableCounts,
    record::PlayerId,
};

/// Aggregate repeat-pairing cost of a table or seating
pub type Cost = u64;

/// Errors that can occur while optimizing a seating
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The players could not be split into tables
    #[error(transparent)]
    Partition(#[from] partition::Error),
    /// A player does not index the matchup matrix
    #[error("player {0} is not in the matchup matrix")]
    UnknownPlayer(PlayerId),
    /// A player appears more than once in the player list
    #[error("player {0} is listed more than once")]
    DuplicatePlayer(PlayerId),
    /// The search options failed validation
    #[error("invalid optimizer options: {0}")]
    InvalidOptions(String),
}

/// Tunable parameters of the search
///
/// The defaults run a single search of `ceil(n ^ 2.5)` iterations for `n`
/// players with no deadline.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Exponent applied to the player count to derive the iteration budget
    #[garde(custom(validate_exponent))]
    pub iteration_exponent: f64,
    /// Fixed iteration budget overriding the exponent when set
    #[garde(skip)]
    pub iterations: Option<usize>,
    /// Number of independent searches, each starting from the initial seating
    #[garde(range(min = 1, max = MAX_RESTARTS))]
    pub restarts: usize,
    /// Wall-clock limit for the whole optimization (None runs to completion)
    #[garde(skip)]
    pub time_limit: Option<Duration>,
}

/// Checks that an iteration exponent is a finite value within
/// [`MIN_ITERATION_EXPONENT`, `MAX_ITERATION_EXPONENT`]
///
/// # Errors
///
/// Returns a `garde::Error` for NaN, infinities and out-of-range values.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn validate_exponent(val: &f64, _ctx: &()) -> garde::Result {
    if (MIN_ITERATION_EXPONENT..=MAX_ITERATION_EXPONENT).contains(val) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_ITERATION_EXPONENT},{MAX_ITERATION_EXPONENT}]",
        )))
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            iteration_exponent: DEFAULT_ITERATION_EXPONENT,
            iterations: None,
            restarts: DEFAULT_RESTARTS,
            time_limit: None,
        }
    }
}

impl Options {
    /// Returns the number of iterations a single search runs for
    /// `player_count` players
    pub fn iteration_budget(&self, player_count: usize) -> usize {
        self.iterations.unwrap_or_else(|| {
            (player_count as f64)
                .powf(self.iteration_exponent)
                .ceil() as usize
        })
    }
}

/// Result of an optimization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// The cheapest seating found
    pub seating: Seating,
    /// Cost of the cheapest seating
    pub cost: Cost,
    /// Cost of the initial positional seating
    pub initial_cost: Cost,
    /// Number of iterations run across all searches
    pub iterations: usize,
    /// Number of times a strictly cheaper seating was found
    pub improvements: usize,
    /// Whether every search ran its full budget
    pub completed: bool,
}

/// Sums the pairing cost of every unordered pair of distinct players at a
/// table
pub fn table_cost(table: &Table, matrix: &MatchupMatrix) -> Cost {
    table
        .pairs()
        .map(|(a, b)| Cost::from(matrix.pair_cost(a, b)))
        .sum()
}

/// Sums [`table_cost`] over every table of a seating
pub fn partition_cost(seating: &Seating, matrix: &MatchupMatrix) -> Cost {
    seating
        .tables()
        .iter()
        .map(|table| table_cost(table, matrix))
        .sum()
}

/// Searches for cheap seatings of a fixed table plan
#[derive(Debug, Clone)]
pub struct SeatingOptimizer<'a> {
    counts: TableCounts,
    matrix: &'a MatchupMatrix,
    options: Options,
}

struct Search {
    seating: Seating,
    cost: Cost,
    iterations: usize,
    improvements: usize,
    completed: bool,
}

impl<'a> SeatingOptimizer<'a> {
    /// Creates an optimizer with default options
    pub fn new(counts: TableCounts, matrix: &'a MatchupMatrix) -> Self {
        Self {
            counts,
            matrix,
            options: Options::default(),
        }
    }

    /// Replaces the search options
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOptions` if the options are out of range.
    pub fn with_options(mut self, options: Options) -> Result<Self, Error> {
        options
            .validate()
            .map_err(|report| Error::InvalidOptions(report.to_string()))?;
        self.options = options;
        Ok(self)
    }

    /// Returns the active search options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Optimizes the seating of `players`
    ///
    /// The initial seating is the positional split of `players` in the
    /// given order. The returned seating is never more expensive than it.
    ///
    /// # Errors
    ///
    /// * `Error::Partition` - the table plan does not fit the players
    /// * `Error::DuplicatePlayer` - a player is listed twice
    /// * `Error::UnknownPlayer` - a player is missing from the matrix
    pub fn optimize(&self, players: &[PlayerId], rng: &mut fastrand::Rng) -> Result<Outcome, Error> {
        let initial = partition_players(&self.counts, players)?;
        self.check_players(players)?;

        let initial_cost = partition_cost(&initial, self.matrix);
        let budget = self.options.iteration_budget(players.len());
        let deadline = self.options.time_limit.map(|limit| (Instant::now(), limit));

        let mut outcome = Outcome {
            seating: initial.clone(),
            cost: initial_cost,
            initial_cost,
            iterations: 0,
            improvements: 0,
            completed: true,
        };

        for restart in 0..self.options.restarts {
            let search = self.search(&initial, initial_cost, budget, deadline, rng)?;
            outcome.iterations += search.iterations;
            outcome.improvements += search.improvements;
            outcome.completed &= search.completed;
            if search.cost < outcome.cost {
                outcome.seating = search.seating;
                outcome.cost = search.cost;
            }
            if !search.completed {
                warn!(
                    "seating search stopped by time limit during run {} of {}",
                    restart + 1,
                    self.options.restarts
                );
                break;
            }
        }

        info!(
            "optimized seating of {} players at {} tables: cost {} -> {} in {} iterations",
            players.len(),
            outcome.seating.len(),
            outcome.initial_cost,
            outcome.cost,
            outcome.iterations
        );

        Ok(outcome)
    }

    fn check_players(&self, players: &[PlayerId]) -> Result<(), Error> {
        let mut seen = HashSet::with_capacity(players.len());
        for &player in players {
            if !seen.insert(player) {
                return Err(Error::DuplicatePlayer(player));
            }
            if !self.matrix.contains(player) {
                return Err(Error::UnknownPlayer(player));
            }
        }
        Ok(())
    }

    fn search(
        &self,
        initial: &Seating,
        initial_cost: Cost,
        budget: usize,
        deadline: Option<(Instant, Duration)>,
        rng: &mut fastrand::Rng,
    ) -> Result<Search, Error> {
        let seat_count = initial.player_count();
        let mut best = initial.clone();
        let mut best_cost = initial_cost;
        let mut current = initial.clone();
        let mut iterations = 0;
        let mut improvements = 0;
        let mut completed = true;

        for iteration in 0..budget {
            if deadline.is_some_and(|(start, limit)| start.elapsed() >= limit) {
                completed = false;
                break;
            }

            let cost = partition_cost(&current, self.matrix);
            if cost < best_cost {
                debug!("iteration {iteration}: seating cost improved {best_cost} -> {cost}");
                best = current;
                best_cost = cost;
                improvements += 1;
            }

            // Non-improving candidates are dropped, so the next swap always
            // starts from the best seating.
            let a = rng.usize(..seat_count);
            let b = rng.usize(..seat_count);
            current = best.swapped(&self.counts, a, b)?;
            iterations += 1;
        }

        Ok(Search {
            seating: best,
            cost: best_cost,
            iterations,
            improvements,
            completed,
        })
    }
}

/// Optimizes the seating of `players` with default options
///
/// # Errors
///
/// See [`SeatingOptimizer::optimize`].
pub fn optimize_seating(
    counts: &TableCounts,
    matrix: &MatchupMatrix,
    players: &[PlayerId],
    rng: &mut fastrand::Rng,
) -> Result<Seating, Error> {
    SeatingOptimizer::new(*counts, matrix)
        .optimize(players, rng)
        .map(|outcome| outcome.seating)
}
