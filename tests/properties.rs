//! Property-based tests for table planning, matchup counting and seating
//!
//! These tests check the structural guarantees of every stage over randomly
//! generated sessions and game logs.
use std::collections::BTreeSet;

use proptest::prelude::*;
use seating::{
    GameRecord, History, MatchupMatrix, PlayerId, SeatingOptimizer, build_frequency_matrix,
    optimizer::Options, partition_cost, partition_players, plan_table_counts,
};

// Player counts the general table formula handles
fn general_player_count() -> impl Strategy<Value = usize> {
    (8usize..=120).prop_filter("11 players has no sized plan", |&n| n != 11)
}

// Game log without duplicate (game, player) rows
fn history_strategy() -> impl Strategy<Value = History> {
    prop::collection::btree_set((0u64..25, 1u32..=16), 0..120).prop_map(|rows| {
        rows.into_iter()
            .map(|(game, player)| GameRecord::new(game, player, 0.0, 1))
            .collect::<History>()
    })
}

fn ids(count: usize) -> Vec<PlayerId> {
    (1..=count as u32).map(PlayerId::new).collect()
}

fn sorted(players: impl IntoIterator<Item = PlayerId>) -> Vec<PlayerId> {
    let mut players = players.into_iter().collect::<Vec<_>>();
    players.sort();
    players
}

proptest! {
    #[test]
    fn test_plan_seats_everyone(player_count in general_player_count()) {
        let counts = plan_table_counts(player_count);

        prop_assert_eq!(4 * counts.four_seat_tables + 5 * counts.five_seat_tables, player_count);
        prop_assert_eq!(counts.four_seat_tables + counts.five_seat_tables, counts.total_tables);
    }

    #[test]
    fn test_frequency_matrix_symmetric(history in history_strategy()) {
        let players = ids(16);
        let matrix = build_frequency_matrix(&history, players.iter().copied());

        prop_assert!(matrix.is_symmetric());
        for &player in &players {
            let games = history
                .records()
                .iter()
                .filter(|record| record.player_id == player)
                .map(|record| record.game_id.clone())
                .collect::<BTreeSet<_>>();
            prop_assert_eq!(matrix.games_played(player), Some(games.len() as u32));
        }
    }

    #[test]
    fn test_partition_preserves_players(player_count in general_player_count(), seed in any::<u64>()) {
        let mut players = ids(player_count);
        fastrand::Rng::with_seed(seed).shuffle(&mut players);
        let counts = plan_table_counts(player_count);
        let seating = partition_players(&counts, &players).unwrap();

        prop_assert_eq!(seating.flatten(), players.clone());
        prop_assert_eq!(seating.len(), counts.total_tables);
        let fours = seating.tables().iter().filter(|table| table.len() == 4).count();
        let fives = seating.tables().iter().filter(|table| table.len() == 5).count();
        prop_assert_eq!(fours, counts.four_seat_tables);
        prop_assert_eq!(fives, counts.five_seat_tables);
    }

    #[test]
    fn test_every_swap_preserves_players(player_count in general_player_count(), seed in any::<u64>()) {
        let players = ids(player_count);
        let counts = plan_table_counts(player_count);
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut seating = partition_players(&counts, &players).unwrap();

        for _ in 0..200 {
            let a = rng.usize(..player_count);
            let b = rng.usize(..player_count);
            let swapped = seating.swapped(&counts, a, b).unwrap();

            prop_assert_eq!(sorted(swapped.players()), players.clone());
            prop_assert_eq!(swapped.len(), seating.len());
            seating = swapped;
        }
    }

    #[test]
    fn test_optimize_never_worse_than_initial(
        history in history_strategy(),
        player_count in prop::sample::select(vec![4usize, 5, 8, 9, 10, 12, 13, 14, 15, 16]),
        seed in any::<u64>(),
    ) {
        let players = ids(player_count);
        let counts = plan_table_counts(player_count);
        let matrix = build_frequency_matrix(&history, players.iter().copied());
        let options = Options { iterations: Some(300), ..Options::default() };

        let outcome = SeatingOptimizer::new(counts, &matrix)
            .with_options(options)
            .unwrap()
            .optimize(&players, &mut fastrand::Rng::with_seed(seed))
            .unwrap();
        let initial = partition_players(&counts, &players).unwrap();

        prop_assert_eq!(outcome.initial_cost, partition_cost(&initial, &matrix));
        prop_assert!(outcome.cost <= outcome.initial_cost);
        prop_assert_eq!(outcome.cost, partition_cost(&outcome.seating, &matrix));
        prop_assert_eq!(sorted(outcome.seating.players()), players);
    }

    #[test]
    fn test_zero_history_costs_nothing(player_count in general_player_count(), seed in any::<u64>()) {
        let players = ids(player_count);
        let counts = plan_table_counts(player_count);
        let matrix = MatchupMatrix::zeros(players.iter().copied());
        let options = Options { iterations: Some(50), ..Options::default() };

        let outcome = SeatingOptimizer::new(counts, &matrix)
            .with_options(options)
            .unwrap()
            .optimize(&players, &mut fastrand::Rng::with_seed(seed))
            .unwrap();

        prop_assert_eq!(outcome.cost, 0);
        prop_assert_eq!(outcome.seating, initial_of(&players, player_count));
    }
}

fn initial_of(players: &[PlayerId], player_count: usize) -> seating::Seating {
    partition_players(&plan_table_counts(player_count), players).unwrap()
}
