#![allow(dead_code)]

use chrono::NaiveDateTime;
use segrank_core::efforts::{parse_start_date, Effort};
use segrank_core::leaderboard::BoardType;
use segrank_core::ratings::RatingsTable;

/// Builder for Effort to keep fixtures short
pub struct EffortBuilder {
    effort: Effort,
}

impl EffortBuilder {
    pub fn new(athlete_id: u64, segment_id: u64) -> Self {
        Self {
            effort: Effort {
                athlete_id,
                segment_id,
                activity_id: athlete_id * 1_000 + segment_id,
                distance: 1000.0,
                elapsed_time: 200.0,
                moving_time: 200.0,
                average_speed: 5.0,
                dist_diff: 0.0,
                seg_average_grade: 1.0,
                seg_distance: 1000.0,
                seg_elevation_low: 0.0,
                seg_elevation_high: 10.0,
                seg_maximum_grade: 3.0,
                tracks_cadence: false,
                tracks_heartrate: false,
                date: date("2015-07-01"),
            },
        }
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.effort.average_speed = speed;
        self.effort.elapsed_time = self.effort.distance / speed;
        self
    }

    pub fn grade(mut self, grade: f64) -> Self {
        self.effort.seg_average_grade = grade;
        self
    }

    pub fn seg_distance(mut self, d: f64) -> Self {
        self.effort.seg_distance = d;
        self
    }

    pub fn activity(mut self, id: u64) -> Self {
        self.effort.activity_id = id;
        self
    }

    pub fn on(mut self, day: &str) -> Self {
        self.effort.date = date(day);
        self
    }

    pub fn heartrate(mut self) -> Self {
        self.effort.tracks_heartrate = true;
        self
    }

    pub fn build(self) -> Effort {
        self.effort
    }
}

pub fn date(s: &str) -> NaiveDateTime {
    parse_start_date(s).expect("bad fixture date")
}

/// One effort per (entity, speed) pair on a shared segment or athlete.
pub fn efforts_with_speeds(board_type: BoardType, speeds: &[(u64, f64)]) -> Vec<Effort> {
    speeds
        .iter()
        .map(|&(id, speed)| match board_type {
            BoardType::Athlete => EffortBuilder::new(id, 1).speed(speed).build(),
            BoardType::Segment => EffortBuilder::new(1, id).speed(speed).build(),
        })
        .collect()
}

/// Ratings table from `(id, [values...])` rows with columns `r1..rk`.
pub fn ratings(board_type: BoardType, rows: &[(u64, Vec<Option<f64>>)]) -> RatingsTable {
    let k = rows.first().map(|(_, v)| v.len()).unwrap_or(1);
    let columns = (1..=k).map(|i| format!("r{}", i)).collect();
    let mut table = RatingsTable::new(board_type, columns).unwrap();
    for (id, values) in rows {
        table.push_row(*id, values.clone()).unwrap();
    }
    table
}
