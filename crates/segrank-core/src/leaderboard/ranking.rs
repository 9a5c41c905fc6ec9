use super::{BoardSize, LeaderboardEntry};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Orders the present scores descending (equal scores by ascending id),
/// keeps the first `board_size`, numbers them from 1 and attaches each
/// entity's mean speed when there is one.
pub fn rank_column(
    ids: &[u64],
    scores: &[Option<f64>],
    board_size: BoardSize,
    speeds: &BTreeMap<u64, f64>,
) -> Vec<LeaderboardEntry> {
    let mut present: Vec<(u64, f64)> = ids
        .iter()
        .zip(scores)
        .filter_map(|(&id, s)| s.map(|s| (id, s)))
        .collect();

    present.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });

    if let Some(n) = board_size.limit() {
        present.truncate(n);
    }

    present
        .into_iter()
        .enumerate()
        .map(|(i, (entity_id, score))| LeaderboardEntry {
            rank: i + 1,
            entity_id,
            score,
            average_speed: speeds.get(&entity_id).copied(),
        })
        .collect()
}
