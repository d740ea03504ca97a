//! Matchup matrices built from the game log
//!
//! Both matrices are square and indexed on each axis by the sorted set of
//! a session's players. The frequency matrix drives the seating optimizer;
//! the score matrix only feeds reporting.

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;
use serde::Serialize;

use crate::{
    history::History,
    record::{PlayerId, Score},
};

/// Sorted player axis shared by both matrix kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PlayerAxis {
    players: Vec<PlayerId>,
    #[serde(skip)]
    index: HashMap<PlayerId, usize>,
}

impl PlayerAxis {
    fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        let players = players.into_iter().collect::<BTreeSet<_>>();
        let index = players
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();
        Self {
            players: players.into_iter().collect(),
            index,
        }
    }

    fn len(&self) -> usize {
        self.players.len()
    }

    fn position(&self, player: PlayerId) -> Option<usize> {
        self.index.get(&player).copied()
    }

    fn members(&self) -> BTreeSet<PlayerId> {
        self.players.iter().copied().collect()
    }
}

/// Co-occurrence counts between the players of a session
///
/// Cell `(a, b)` for `a != b` holds how many historical games `a` and `b`
/// shared a table in; cell `(a, a)` holds the number of games `a` played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchupMatrix {
    #[serde(flatten)]
    axis: PlayerAxis,
    cells: Array2<u32>,
}

impl MatchupMatrix {
    /// Creates an all-zero matrix over the given players
    pub fn zeros(players: impl IntoIterator<Item = PlayerId>) -> Self {
        let axis = PlayerAxis::new(players);
        let n = axis.len();
        Self {
            axis,
            cells: Array2::zeros((n, n)),
        }
    }

    /// Returns the players indexing this matrix, in ascending order
    pub fn players(&self) -> &[PlayerId] {
        &self.axis.players
    }

    /// Returns the number of players indexing this matrix
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    /// Checks if the matrix has no players
    pub fn is_empty(&self) -> bool {
        self.axis.len() == 0
    }

    /// Checks if a player indexes this matrix
    pub fn contains(&self, player: PlayerId) -> bool {
        self.axis.position(player).is_some()
    }

    /// Returns cell `(a, b)`, or `None` if either player is not in the matrix
    pub fn get(&self, a: PlayerId, b: PlayerId) -> Option<u32> {
        Some(self.cells[[self.axis.position(a)?, self.axis.position(b)?]])
    }

    /// Returns the number of historical games a player took part in
    pub fn games_played(&self, player: PlayerId) -> Option<u32> {
        self.get(player, player)
    }

    /// Repeat-pairing cost between two distinct players
    ///
    /// This is the larger of the two cells for the pair, so that an
    /// asymmetric matrix never under-reports a repeat. Players missing
    /// from the matrix have no recorded history and cost nothing.
    pub fn pair_cost(&self, a: PlayerId, b: PlayerId) -> u32 {
        match (self.axis.position(a), self.axis.position(b)) {
            (Some(i), Some(j)) => self.cells[[i, j]].max(self.cells[[j, i]]),
            _ => 0,
        }
    }

    /// Sets cell `(a, b)` directly
    ///
    /// Returns `false` and leaves the matrix unchanged if either player is
    /// not in the matrix.
    pub fn set(&mut self, a: PlayerId, b: PlayerId, value: u32) -> bool {
        match (self.axis.position(a), self.axis.position(b)) {
            (Some(i), Some(j)) => {
                self.cells[[i, j]] = value;
                true
            }
            _ => false,
        }
    }

    /// Checks whether every off-diagonal cell equals its mirror
    pub fn is_symmetric(&self) -> bool {
        self.cells == self.cells.t()
    }

    /// Returns the raw cells, rows and columns ordered as [`Self::players`]
    pub fn cells(&self) -> &Array2<u32> {
        &self.cells
    }
}

/// Builds the co-occurrence matrix of `players` from `history`
///
/// Only rows of the given players are considered. Every game then adds one
/// to cell `(a, b)` for each ordered pair of its remaining players,
/// including `a == b`. Players without any history keep all-zero rows.
pub fn build_frequency_matrix(
    history: &History,
    players: impl IntoIterator<Item = PlayerId>,
) -> MatchupMatrix {
    let mut matrix = MatchupMatrix::zeros(players);
    let restricted = history.restricted_to(&matrix.axis.members());

    for records in restricted.by_game().values() {
        let seats = records
            .iter()
            .filter_map(|record| matrix.axis.position(record.player_id))
            .collect::<Vec<_>>();
        for &i in &seats {
            for &j in &seats {
                matrix.cells[[i, j]] += 1;
            }
        }
    }

    matrix
}

/// Average scores between the players of a session
///
/// Cell `(a, b)` for `a != b` holds the mean score `a` earned in games
/// shared with `b`; cell `(a, a)` holds `a`'s mean score over all games.
/// A cell is `None` when its denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    #[serde(flatten)]
    axis: PlayerAxis,
    cells: Array2<Option<Score>>,
}

impl ScoreMatrix {
    /// Returns the players indexing this matrix, in ascending order
    pub fn players(&self) -> &[PlayerId] {
        &self.axis.players
    }

    /// Returns the number of players indexing this matrix
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    /// Checks if the matrix has no players
    pub fn is_empty(&self) -> bool {
        self.axis.len() == 0
    }

    /// Returns cell `(a, b)`
    ///
    /// The outer `Option` is `None` if either player is not in the matrix;
    /// the inner one is `None` if the average is undefined.
    pub fn get(&self, a: PlayerId, b: PlayerId) -> Option<Option<Score>> {
        Some(self.cells[[self.axis.position(a)?, self.axis.position(b)?]])
    }

    /// Returns a player's mean score over all their games
    pub fn mean_score(&self, player: PlayerId) -> Option<Score> {
        self.get(player, player).flatten()
    }
}

/// Builds the average score matrix of `players` from `history`
pub fn build_score_matrix(
    history: &History,
    players: impl IntoIterator<Item = PlayerId>,
) -> ScoreMatrix {
    let frequency = build_frequency_matrix(history, players);
    let axis = frequency.axis.clone();
    let n = axis.len();
    let restricted = history.restricted_to(&axis.members());

    let mut sums = Array2::<Score>::zeros((n, n));
    for records in restricted.by_game().values() {
        let seats = records
            .iter()
            .filter_map(|record| Some((axis.position(record.player_id)?, record.score)))
            .collect::<Vec<_>>();
        for &(i, score) in &seats {
            for &(j, _) in &seats {
                sums[[i, j]] += score;
            }
        }
    }

    let cells = Array2::from_shape_fn((n, n), |(i, j)| {
        let games = frequency.cells[[i, j]];
        (games > 0).then(|| sums[[i, j]] / f64::from(games))
    });

    ScoreMatrix { axis, cells }
}
