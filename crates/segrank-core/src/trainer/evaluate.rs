use super::FactorModel;
use crate::efforts::PairObservation;
use crate::error::{SegRankError, SrResult};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub rmse: f64,
    pub mae: f64,
    pub evaluated: usize,
    /// Pairs whose athlete or segment the model never saw.
    pub skipped: usize,
}

/// Scores the model against held-out pairs.
pub fn evaluate(model: &FactorModel, pairs: &[PairObservation]) -> SrResult<Evaluation> {
    let residuals: Vec<f64> = pairs
        .par_iter()
        .filter_map(|p| {
            model
                .predict(p.athlete_id, p.segment_id)
                .map(|pred| p.average_speed - pred)
        })
        .collect();

    if residuals.is_empty() {
        return Err(SegRankError::EmptyDataset(
            "no test pair shares an athlete and segment with the model".to_string(),
        ));
    }

    let n = residuals.len() as f64;
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let sae: f64 = residuals.iter().map(|r| r.abs()).sum();

    Ok(Evaluation {
        rmse: (sse / n).sqrt(),
        mae: sae / n,
        evaluated: residuals.len(),
        skipped: pairs.len() - residuals.len(),
    })
}
