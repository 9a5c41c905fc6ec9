use super::{FactorModel, FactorSide};
use crate::config::TrainParams;
use crate::efforts::PairObservation;
use crate::error::{SegRankError, SrResult};
use itertools::Itertools;
use tracing::{debug, info};

/// Stochastic gradient descent over the observed pairs, visiting them in a
/// freshly shuffled order each pass. Deterministic for a given seed.
pub fn train(pairs: &[PairObservation], params: &TrainParams) -> SrResult<FactorModel> {
    params.validate()?;
    if pairs.is_empty() {
        return Err(SegRankError::EmptyDataset(
            "cannot train on zero observations".to_string(),
        ));
    }

    let k = params.num_factors;
    let mut rng = fastrand::Rng::with_seed(params.seed);

    let athlete_ids: Vec<u64> = pairs.iter().map(|p| p.athlete_id).sorted().dedup().collect();
    let segment_ids: Vec<u64> = pairs.iter().map(|p| p.segment_id).sorted().dedup().collect();

    let athletes = FactorSide::new(athlete_ids, k, &mut rng, params.init_scale);
    let segments = FactorSide::new(segment_ids, k, &mut rng, params.init_scale);

    let global_mean = pairs.iter().map(|p| p.average_speed).sum::<f64>() / pairs.len() as f64;

    let mut model = FactorModel {
        num_factors: k,
        global_mean,
        athletes,
        segments,
    };

    // (athlete row, segment row, target)
    let observations: Vec<(usize, usize, f64)> = pairs
        .iter()
        .map(|p| {
            (
                model.athletes.index[&p.athlete_id],
                model.segments.index[&p.segment_id],
                p.average_speed,
            )
        })
        .collect();

    info!(
        "🧮 Training {}-factor model on {} pairs ({} athletes, {} segments)",
        k,
        observations.len(),
        model.athletes.ids.len(),
        model.segments.ids.len()
    );

    let lr = params.learning_rate;
    let reg = params.regularization;
    let lin_reg = params.linear_regularization;
    let mut order: Vec<usize> = (0..observations.len()).collect();

    for iteration in 0..params.max_iterations {
        rng.shuffle(&mut order);

        for &o in &order {
            let (a, s, target) = observations[o];
            let err = target - model.predict_indexed(a, s);

            let ab = model.athletes.bias[a];
            let sb = model.segments.bias[s];
            model.athletes.bias[a] += lr * (err - lin_reg * ab);
            model.segments.bias[s] += lr * (err - lin_reg * sb);

            let (ua, vs) = (a * k, s * k);
            for f in 0..k {
                let u = model.athletes.factors[ua + f];
                let v = model.segments.factors[vs + f];
                model.athletes.factors[ua + f] += lr * (err * v - reg * u);
                model.segments.factors[vs + f] += lr * (err * u - reg * v);
            }
        }

        let rmse = training_rmse(&model, &observations);
        if !rmse.is_finite() {
            return Err(SegRankError::Validation(format!(
                "Training diverged at iteration {}; lower the learning rate (currently {})",
                iteration + 1,
                lr
            )));
        }
        debug!("Iteration {:>4}: training RMSE {:.5}", iteration + 1, rmse);
    }

    info!(
        "✅ Training finished: RMSE {:.4}",
        training_rmse(&model, &observations)
    );
    Ok(model)
}

fn training_rmse(model: &FactorModel, observations: &[(usize, usize, f64)]) -> f64 {
    let sse: f64 = observations
        .iter()
        .map(|&(a, s, y)| (y - model.predict_indexed(a, s)).powi(2))
        .sum();
    (sse / observations.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: u64, s: u64, speed: f64) -> PairObservation {
        PairObservation {
            athlete_id: a,
            segment_id: s,
            average_speed: speed,
            efforts: 1,
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert!(train(&[], &TrainParams::default()).is_err());
    }

    #[test]
    fn test_global_mean() {
        let pairs = vec![pair(1, 1, 4.0), pair(2, 1, 6.0)];
        let params = TrainParams {
            max_iterations: 0,
            ..Default::default()
        };
        let model = train(&pairs, &params).unwrap();
        assert_eq!(model.global_mean, 5.0);
        assert_eq!(model.athlete_ratings().unwrap().len(), 2);
        assert_eq!(model.segment_ratings().unwrap().len(), 1);
    }

    #[test]
    fn test_divergence_reported() {
        let pairs = vec![pair(1, 1, 1e6), pair(2, 2, -1e6), pair(1, 2, 3e6)];
        let params = TrainParams {
            learning_rate: 50.0,
            init_scale: 10.0,
            max_iterations: 200,
            ..Default::default()
        };
        assert!(train(&pairs, &params).is_err());
    }
}
