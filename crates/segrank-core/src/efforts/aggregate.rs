use super::Effort;
use crate::filters::EffortFilter;
use crate::leaderboard::BoardType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean speed of one athlete over all their efforts on one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairObservation {
    pub athlete_id: u64,
    pub segment_id: u64,
    pub average_speed: f64,
    pub efforts: usize,
}

/// Static description of a segment, taken from its first effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentProfile {
    pub segment_id: u64,
    pub seg_average_grade: f64,
    pub seg_distance: f64,
    pub seg_elevation_low: f64,
    pub seg_elevation_high: f64,
    pub seg_maximum_grade: f64,
}

#[derive(Default, Clone, Copy)]
struct Accum {
    sum: f64,
    n: usize,
}

impl Accum {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.n as f64
    }
}

/// Collapses efforts into one observation per (athlete, segment), ordered by
/// athlete then segment.
pub fn aggregate_pairs(efforts: &[Effort]) -> Vec<PairObservation> {
    let mut groups: BTreeMap<(u64, u64), Accum> = BTreeMap::new();
    for e in efforts {
        groups
            .entry((e.athlete_id, e.segment_id))
            .or_default()
            .push(e.average_speed);
    }

    groups
        .into_iter()
        .map(|((athlete_id, segment_id), acc)| PairObservation {
            athlete_id,
            segment_id,
            average_speed: acc.mean(),
            efforts: acc.n,
        })
        .collect()
}

/// Mean `average_speed` per athlete or segment over the efforts accepted by
/// `filter`. Entities with no accepted effort are absent from the map.
pub fn mean_speed_by(
    efforts: &[Effort],
    board_type: BoardType,
    filter: &EffortFilter,
) -> BTreeMap<u64, f64> {
    let mut groups: BTreeMap<u64, Accum> = BTreeMap::new();
    for e in efforts.iter().filter(|e| filter.matches(e)) {
        groups
            .entry(e.entity_id(board_type))
            .or_default()
            .push(e.average_speed);
    }
    groups.into_iter().map(|(id, acc)| (id, acc.mean())).collect()
}

pub fn segment_profiles(efforts: &[Effort]) -> BTreeMap<u64, SegmentProfile> {
    let mut profiles = BTreeMap::new();
    for e in efforts {
        profiles.entry(e.segment_id).or_insert_with(|| SegmentProfile {
            segment_id: e.segment_id,
            seg_average_grade: e.seg_average_grade,
            seg_distance: e.seg_distance,
            seg_elevation_low: e.seg_elevation_low,
            seg_elevation_high: e.seg_elevation_high,
            seg_maximum_grade: e.seg_maximum_grade,
        });
    }
    profiles
}
