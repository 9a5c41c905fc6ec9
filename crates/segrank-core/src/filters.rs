//! Effort predicates used to restrict which efforts count when judging the
//! orientation of a latent feature, and to carve training subsets.

use crate::efforts::Effort;
use crate::error::{SegRankError, SrResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum EffortFilter {
    #[default]
    All,
    GradeAtLeast(f64),
    GradeBelow(f64),
    DistanceAtLeast(f64),
    DistanceBelow(f64),
    TracksHeartrate,
    TracksCadence,
    Segments(Vec<u64>),
    AllOf(Vec<EffortFilter>),
}

impl EffortFilter {
    pub fn matches(&self, e: &Effort) -> bool {
        match self {
            EffortFilter::All => true,
            EffortFilter::GradeAtLeast(g) => e.seg_average_grade >= *g,
            EffortFilter::GradeBelow(g) => e.seg_average_grade < *g,
            EffortFilter::DistanceAtLeast(d) => e.seg_distance >= *d,
            EffortFilter::DistanceBelow(d) => e.seg_distance < *d,
            EffortFilter::TracksHeartrate => e.tracks_heartrate,
            EffortFilter::TracksCadence => e.tracks_cadence,
            EffortFilter::Segments(ids) => ids.contains(&e.segment_id),
            EffortFilter::AllOf(parts) => parts.iter().all(|f| f.matches(e)),
        }
    }

    pub fn apply(&self, efforts: &[Effort]) -> Vec<Effort> {
        efforts.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

static NO_FILTER: EffortFilter = EffortFilter::All;

/// Feature column name -> filter over the effort table.
///
/// Columns without an entry are judged against every effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrientationFilters {
    by_column: BTreeMap<String, EffortFilter>,
}

impl OrientationFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, filter: EffortFilter) -> Self {
        self.register(column, filter);
        self
    }

    pub fn register(&mut self, column: impl Into<String>, filter: EffortFilter) {
        self.by_column.insert(column.into(), filter);
    }

    pub fn get(&self, column: &str) -> &EffortFilter {
        self.by_column.get(column).unwrap_or(&NO_FILTER)
    }

    pub fn len(&self) -> usize {
        self.by_column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }

    pub fn extend(&mut self, other: OrientationFilters) {
        self.by_column.extend(other.by_column);
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SrResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SrResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Named training subsets, e.g. `{"climbs": {"GradeAtLeast": 4.0}}`.
pub fn load_subsets<P: AsRef<Path>>(path: P) -> SrResult<BTreeMap<String, EffortFilter>> {
    let content = fs::read_to_string(path)?;
    let subsets: BTreeMap<String, EffortFilter> = serde_json::from_str(&content)?;
    if let Some(bad) = subsets.keys().find(|k| k.is_empty() || k.contains(char::is_whitespace)) {
        return Err(SegRankError::Config(format!(
            "Subset name '{}' must be non-empty and contain no whitespace",
            bad
        )));
    }
    Ok(subsets)
}
