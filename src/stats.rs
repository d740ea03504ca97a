//! Per-player statistics over the game log
//!
//! These aggregates are purely informational and do not feed the seating
//! optimizer. Statistics are split by the size of the historical table,
//! which is the number of rows recorded for that game.

use std::collections::{BTreeMap, HashMap};

use enum_map::EnumMap;
use itertools::Itertools;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::{
    history::History,
    planner::TableSize,
    record::{GameId, GameRecord, PlayerId},
};

/// Mean and sample standard deviation of a series of values
///
/// The mean is undefined without samples and the standard deviation is
/// undefined with fewer than two.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    /// Number of values summarized
    pub samples: usize,
    /// Arithmetic mean of the values
    pub mean: Option<f64>,
    /// Sample standard deviation of the values
    pub std_dev: Option<f64>,
}

impl Summary {
    /// Summarizes a series of values
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values.into_iter().collect_vec();
        let samples = values.len();
        if samples == 0 {
            return Self::default();
        }

        let mean = values.iter().sum::<f64>() / samples as f64;
        let std_dev = (samples > 1).then(|| {
            let squares = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (squares / (samples - 1) as f64).sqrt()
        });

        Self {
            samples,
            mean: Some(mean),
            std_dev,
        }
    }
}

/// Aggregate history of a single player
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlayerStats {
    /// Total number of games played
    pub games_played: usize,
    /// Number of games played at each supported table size
    pub games_by_size: EnumMap<TableSize, usize>,
    /// Score over all games
    pub score: Summary,
    /// Rank over all games
    pub rank: Summary,
    /// Rank over the games played at each supported table size
    pub rank_by_size: EnumMap<TableSize, Summary>,
}

impl PlayerStats {
    fn from_records(records: &[&GameRecord], game_sizes: &HashMap<&GameId, usize>) -> Self {
        let mut stats = Self {
            games_played: records.iter().map(|record| &record.game_id).unique().count(),
            score: Summary::of(records.iter().map(|record| record.score)),
            rank: Summary::of(records.iter().map(|record| f64::from(record.rank))),
            ..Self::default()
        };

        let by_size = records
            .iter()
            .filter_map(|record| {
                let size = TableSize::from_seats(*game_sizes.get(&record.game_id)?)?;
                Some((size, f64::from(record.rank)))
            })
            .into_group_map();
        for (size, ranks) in by_size {
            stats.games_by_size[size] = ranks.len();
            stats.rank_by_size[size] = Summary::of(ranks);
        }

        stats
    }
}

/// Computes statistics for each of `players` from `history`
///
/// Table sizes are measured on the full history, so a game keeps its size
/// even if some of its players are not part of the session. Players with no
/// history get empty statistics.
pub fn player_stats(
    history: &History,
    players: impl IntoIterator<Item = PlayerId>,
) -> BTreeMap<PlayerId, PlayerStats> {
    let game_sizes = history.game_sizes();
    let by_player = history.by_player();

    players
        .into_iter()
        .map(|player| {
            let stats = by_player
                .get(&player)
                .map(|records| PlayerStats::from_records(records, &game_sizes))
                .unwrap_or_default();
            (player, stats)
        })
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn table(game: &str, scores: &[(u32, f64)]) -> Vec<GameRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(seat, &(player, score))| GameRecord::new(game, player, score, seat as u32 + 1))
            .collect()
    }

    fn sample() -> History {
        let mut records = table("a", &[(1, 40.0), (2, 20.0), (3, 0.0), (4, -60.0)]);
        records.extend(table("b", &[(2, 30.0), (1, 10.0), (5, 0.0), (6, -15.0), (7, -25.0)]));
        records.extend(table("c", &[(3, 5.0), (1, -5.0)]));
        records.into()
    }

    fn approx(value: Option<f64>, expected: f64) -> bool {
        value.is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_summary_of_values() {
        let summary = Summary::of([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert_eq!(summary.samples, 8);
        assert!(approx(summary.mean, 5.0));
        assert!(approx(summary.std_dev, (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn test_summary_undefined_values() {
        assert_eq!(Summary::of([]), Summary::default());

        let single = Summary::of([3.0]);
        assert_eq!(single.mean, Some(3.0));
        assert_eq!(single.std_dev, None);
    }

    #[test]
    fn test_player_stats_split_by_table_size() {
        let stats = player_stats(&sample(), [PlayerId::new(1)]);
        let one = &stats[&PlayerId::new(1)];

        assert_eq!(one.games_played, 3);
        assert_eq!(one.games_by_size[TableSize::Four], 1);
        assert_eq!(one.games_by_size[TableSize::Five], 1);
        assert!(approx(one.score.mean, 15.0));
        assert!(approx(one.rank.mean, 5.0 / 3.0));
        assert_eq!(one.rank_by_size[TableSize::Four].mean, Some(1.0));
        assert_eq!(one.rank_by_size[TableSize::Five].mean, Some(2.0));
        assert_eq!(one.rank_by_size[TableSize::Five].std_dev, None);
    }

    #[test]
    fn test_player_stats_without_history() {
        let stats = player_stats(&sample(), [PlayerId::new(42)]);
        let nobody = &stats[&PlayerId::new(42)];

        assert_eq!(nobody, &PlayerStats::default());
        assert_eq!(nobody.score.mean, None);
    }

    #[test]
    fn test_player_stats_only_requested_players() {
        let stats = player_stats(&sample(), [PlayerId::new(2), PlayerId::new(5)]);

        assert_eq!(stats.keys().copied().collect_vec(), vec![PlayerId::new(2), PlayerId::new(5)]);
        assert!(approx(stats[&PlayerId::new(2)].score.std_dev, 50.0_f64.sqrt()));
    }

    #[test]
    fn test_player_stats_serialize_skips_undefined() {
        let stats = player_stats(&History::default(), [PlayerId::new(1)]);
        let json = serde_json::to_string(&stats[&PlayerId::new(1)]).unwrap();

        assert!(json.contains("\"games_played\":0"));
        assert!(!json.contains("std_dev"));
    }
}
