//! Segment effort records and the cleaning steps applied at load time.

pub mod aggregate;
pub mod clean;
pub mod loader;

pub use self::aggregate::{aggregate_pairs, mean_speed_by, segment_profiles, PairObservation};
pub use self::clean::{remove_outliers, split_by_date};
pub use self::loader::{load_efforts, load_efforts_csv, load_efforts_jsonl, write_efforts_csv};

use crate::leaderboard::BoardType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One athlete's attempt at one segment during one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effort {
    pub athlete_id: u64,
    pub segment_id: u64,
    pub activity_id: u64,
    pub distance: f64,
    pub elapsed_time: f64,
    pub moving_time: f64,
    pub average_speed: f64,
    pub dist_diff: f64,
    pub seg_average_grade: f64,
    pub seg_distance: f64,
    pub seg_elevation_low: f64,
    pub seg_elevation_high: f64,
    pub seg_maximum_grade: f64,
    pub tracks_cadence: bool,
    pub tracks_heartrate: bool,
    pub date: NaiveDateTime,
}

impl Effort {
    /// Both timings positive and a finite speed.
    pub fn has_valid_timing(&self) -> bool {
        self.moving_time > 0.0 && self.elapsed_time > 0.0 && self.average_speed.is_finite()
    }

    #[inline]
    pub fn entity_id(&self, board_type: BoardType) -> u64 {
        match board_type {
            BoardType::Athlete => self.athlete_id,
            BoardType::Segment => self.segment_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSegment {
    pub id: u64,
    pub average_grade: f64,
    pub distance: f64,
    pub elevation_low: f64,
    pub elevation_high: f64,
    pub maximum_grade: f64,
}

/// Effort as returned by the Strava segment-efforts endpoint. Unused fields
/// are ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEffort {
    pub athlete: IdRef,
    pub segment: RawSegment,
    pub activity: IdRef,
    pub distance: f64,
    pub elapsed_time: f64,
    pub moving_time: f64,
    pub start_date_local: String,
    #[serde(default)]
    pub average_cadence: Option<f64>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
}

impl RawEffort {
    /// Flattens the nested record and derives speed, distance delta and
    /// tracking flags. Returns `None` unless the result has valid timing.
    pub fn into_effort(self) -> Option<Effort> {
        if self.moving_time <= 0.0 || self.elapsed_time <= 0.0 {
            return None;
        }
        let date = parse_start_date(&self.start_date_local)?;

        let effort = Effort {
            athlete_id: self.athlete.id,
            segment_id: self.segment.id,
            activity_id: self.activity.id,
            distance: self.distance,
            elapsed_time: self.elapsed_time,
            moving_time: self.moving_time,
            average_speed: self.distance / self.elapsed_time,
            dist_diff: self.segment.distance - self.distance,
            seg_average_grade: self.segment.average_grade,
            seg_distance: self.segment.distance,
            seg_elevation_low: self.segment.elevation_low,
            seg_elevation_high: self.segment.elevation_high,
            seg_maximum_grade: self.segment.maximum_grade,
            tracks_cadence: self.average_cadence.is_some(),
            tracks_heartrate: self.average_heartrate.is_some(),
            date,
        };
        effort.has_valid_timing().then_some(effort)
    }
}

/// Strava stamps local start times with a trailing `Z` even though they are
/// not UTC, so the offset is discarded and the wall-clock time kept.
pub fn parse_start_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
