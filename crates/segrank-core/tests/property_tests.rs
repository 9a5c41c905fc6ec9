use proptest::prelude::*;
use segrank_core::efforts::Effort;
use segrank_core::leaderboard::ranking::rank_column;
use segrank_core::leaderboard::scaling::scale_column;
use segrank_core::leaderboard::{compute_column, BoardSize, BoardType, LeaderboardRequest};
use segrank_core::ratings::RatingsTable;
use std::collections::BTreeMap;

mod common;
use common::efforts_with_speeds;

// --- STRATEGIES ---

prop_compose! {
    fn arb_column()(
        values in proptest::collection::vec(proptest::option::weighted(0.8, -50.0..50.0f64), 1..40)
    ) -> Vec<Option<f64>> {
        values
    }
}

prop_compose! {
    fn arb_board()(
        column in arb_column(),
        size in 0usize..50,
        speed_seed in any::<u64>()
    ) -> (RatingsTable, Vec<Effort>, BoardSize) {
        let mut table = RatingsTable::new(BoardType::Athlete, vec!["f".to_string()]).unwrap();
        let mut rng = fastrand::Rng::with_seed(speed_seed);
        let mut speeds = Vec::new();
        for (i, v) in column.into_iter().enumerate() {
            let id = i as u64 + 1;
            table.push_row(id, vec![v]).unwrap();
            if rng.bool() {
                speeds.push((id, 1.0 + rng.f64() * 10.0));
            }
        }
        (table, efforts_with_speeds(BoardType::Athlete, &speeds), BoardSize::from(size))
    }
}

prop_compose! {
    fn arb_wide_column()(
        values in proptest::collection::vec(
            proptest::option::weighted(0.8, prop_oneof![-1.0e308..0.0f64, 0.0..1.0e308f64]),
            1..40,
        )
    ) -> Vec<Option<f64>> {
        values
    }
}

fn distinct(values: &[f64]) -> bool {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).all(|w| w[0] != w[1])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn test_scaled_column_hits_both_ends(column in arb_column(), flip in any::<bool>()) {
        let multiplier = if flip { -1.0 } else { 1.0 };
        let scaled = scale_column(&column, multiplier);

        prop_assert_eq!(scaled.len(), column.len());
        for (raw, out) in column.iter().zip(&scaled) {
            prop_assert_eq!(raw.is_some(), out.is_some());
        }

        let present: Vec<f64> = column.iter().flatten().copied().collect();
        let out: Vec<f64> = scaled.iter().flatten().copied().collect();
        prop_assert!(out.iter().all(|v| (0.0..=100.0).contains(v)));

        if present.len() >= 2 && distinct(&present) {
            let min = out.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = out.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(min, 0.0);
            prop_assert_eq!(max, 100.0);
        }
    }

    #[test]
    fn test_wide_column_stays_in_range(column in arb_wide_column(), flip in any::<bool>()) {
        let multiplier = if flip { -1.0 } else { 1.0 };
        let out: Vec<f64> = scale_column(&column, multiplier).into_iter().flatten().collect();

        prop_assert!(out.iter().all(|v| v.is_finite() && (0.0..=100.0).contains(v)));

        let present: Vec<f64> = column.iter().flatten().copied().collect();
        if present.len() >= 2 && distinct(&present) {
            let min = out.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = out.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(min, 0.0);
            prop_assert_eq!(max, 100.0);
        }
    }

    #[test]
    fn test_ranks_are_dense_and_ordered(column in arb_column(), size in 0usize..50) {
        let ids: Vec<u64> = (1..=column.len() as u64).collect();
        let board_size = BoardSize::from(size);
        let entries = rank_column(&ids, &column, board_size, &BTreeMap::new());

        let present = column.iter().flatten().count();
        let expected = board_size.limit().map_or(present, |n| n.min(present));
        prop_assert_eq!(entries.len(), expected);

        for (i, e) in entries.iter().enumerate() {
            prop_assert_eq!(e.rank, i + 1);
        }
        for w in entries.windows(2) {
            prop_assert!(
                w[0].score > w[1].score || (w[0].score == w[1].score && w[0].entity_id < w[1].entity_id)
            );
        }
    }

    #[test]
    fn test_compute_is_idempotent((table, efforts, size) in arb_board()) {
        let request = LeaderboardRequest::builder()
            .board_type(BoardType::Athlete)
            .board_size(size)
            .build();
        let before = table.clone();

        let first = compute_column(&request, &table, "f", &efforts).unwrap();
        let second = compute_column(&request, &table, "f", &efforts).unwrap();

        prop_assert_eq!(&table, &before);
        prop_assert_eq!(first, second);
    }
}
