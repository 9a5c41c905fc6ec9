//! Low-rank factorization of (athlete, segment) mean speeds.

pub mod evaluate;
pub mod sgd;

pub use self::evaluate::{evaluate, Evaluation};
pub use self::sgd::train;

use crate::config::TrainParams;
use crate::efforts::{aggregate_pairs, Effort};
use crate::error::{SegRankError, SrResult};
use crate::filters::{EffortFilter, OrientationFilters};
use crate::leaderboard::BoardType;
use crate::ratings::RatingsTable;
use std::collections::HashMap;
use tracing::info;

/// Fitted model: `speed ≈ μ + b_athlete + b_segment + <u_athlete, v_segment>`.
#[derive(Debug, Clone)]
pub struct FactorModel {
    pub num_factors: usize,
    pub global_mean: f64,
    pub(crate) athletes: FactorSide,
    pub(crate) segments: FactorSide,
}

/// Ids, biases and flattened `n x k` factor matrix for one side.
#[derive(Debug, Clone)]
pub(crate) struct FactorSide {
    pub ids: Vec<u64>,
    pub index: HashMap<u64, usize>,
    pub bias: Vec<f64>,
    pub factors: Vec<f64>,
}

impl FactorSide {
    pub fn new(ids: Vec<u64>, k: usize, rng: &mut fastrand::Rng, init_scale: f64) -> Self {
        let index = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let factors = (0..ids.len() * k)
            .map(|_| (rng.f64() * 2.0 - 1.0) * init_scale)
            .collect();
        Self {
            bias: vec![0.0; ids.len()],
            ids,
            index,
            factors,
        }
    }

    #[inline]
    pub fn row(&self, i: usize, k: usize) -> &[f64] {
        &self.factors[i * k..(i + 1) * k]
    }

    fn ratings(&self, board_type: BoardType, k: usize) -> SrResult<RatingsTable> {
        let mut table = RatingsTable::with_factors(board_type, k);
        for (i, &id) in self.ids.iter().enumerate() {
            let row = self.row(i, k).iter().map(|&v| Some(v)).collect();
            table.push_row(id, row)?;
        }
        Ok(table)
    }
}

impl FactorModel {
    pub fn predict(&self, athlete_id: u64, segment_id: u64) -> Option<f64> {
        let a = *self.athletes.index.get(&athlete_id)?;
        let s = *self.segments.index.get(&segment_id)?;
        Some(self.predict_indexed(a, s))
    }

    #[inline]
    pub(crate) fn predict_indexed(&self, a: usize, s: usize) -> f64 {
        let k = self.num_factors;
        let dot: f64 = self
            .athletes
            .row(a, k)
            .iter()
            .zip(self.segments.row(s, k))
            .map(|(u, v)| u * v)
            .sum();
        self.global_mean + self.athletes.bias[a] + self.segments.bias[s] + dot
    }

    pub fn athlete_factors(&self, athlete_id: u64) -> Option<&[f64]> {
        let i = *self.athletes.index.get(&athlete_id)?;
        Some(self.athletes.row(i, self.num_factors))
    }

    pub fn segment_factors(&self, segment_id: u64) -> Option<&[f64]> {
        let i = *self.segments.index.get(&segment_id)?;
        Some(self.segments.row(i, self.num_factors))
    }

    /// Latent factors as `rating_1..rating_k`. Biases are not emitted.
    pub fn athlete_ratings(&self) -> SrResult<RatingsTable> {
        self.athletes.ratings(BoardType::Athlete, self.num_factors)
    }

    pub fn segment_ratings(&self) -> SrResult<RatingsTable> {
        self.segments.ratings(BoardType::Segment, self.num_factors)
    }
}

/// Output of [`train_ratings`].
#[derive(Debug, Clone)]
pub struct TrainedRatings {
    pub model: FactorModel,
    pub athletes: RatingsTable,
    pub segments: RatingsTable,
    /// Orientation filter for every emitted column; empty for unnamed runs.
    pub filters: OrientationFilters,
}

/// Aggregates `efforts` and fits a model. With a named subset, training
/// sees only the matching efforts, the rating columns are prefixed with the
/// subset name, and the subset's filter is registered for each of them.
pub fn train_ratings(
    efforts: &[Effort],
    params: &TrainParams,
    subset: Option<(&str, &EffortFilter)>,
) -> SrResult<TrainedRatings> {
    let selected: Vec<Effort>;
    let efforts = match subset {
        Some((name, filter)) => {
            selected = filter.apply(efforts);
            info!(
                "Subset '{}' keeps {} of {} efforts",
                name,
                selected.len(),
                efforts.len()
            );
            &selected[..]
        }
        None => efforts,
    };

    let pairs = aggregate_pairs(efforts);
    if pairs.is_empty() {
        return Err(SegRankError::EmptyDataset(
            "no (athlete, segment) pairs to train on".to_string(),
        ));
    }

    let model = train(&pairs, params)?;
    let mut athletes = model.athlete_ratings()?;
    let mut segments = model.segment_ratings()?;
    let mut filters = OrientationFilters::new();

    if let Some((name, filter)) = subset {
        athletes = athletes.with_prefix(name);
        segments = segments.with_prefix(name);
        // both sides share column names
        for column in athletes.columns() {
            filters.register(column.clone(), filter.clone());
        }
    }

    Ok(TrainedRatings {
        model,
        athletes,
        segments,
        filters,
    })
}
