use super::load_clean_efforts;
use crate::reports;
use clap::Args;
use segrank_core::config::Config;
use segrank_core::efforts::{aggregate_pairs, parse_start_date, split_by_date, PairObservation};
use segrank_core::error::{SegRankError, SrResult};
use segrank_core::trainer::{evaluate, train, Evaluation};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub efforts: PathBuf,

    /// Train on efforts up to this date, test on the rest
    #[arg(long)]
    pub split_date: String,

    /// Print the result as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationReport<'a> {
    split_date: &'a str,
    train_pairs: usize,
    test_pairs: usize,
    model: Evaluation,
    baseline_rmse: f64,
}

/// RMSE of always predicting the training mean.
fn baseline_rmse(train: &[PairObservation], test: &[PairObservation]) -> f64 {
    let mean = train.iter().map(|p| p.average_speed).sum::<f64>() / train.len() as f64;
    let sse: f64 = test.iter().map(|p| (p.average_speed - mean).powi(2)).sum();
    (sse / test.len() as f64).sqrt()
}

pub fn run(args: EvaluateArgs, config: &Config) -> SrResult<()> {
    let cutoff = parse_start_date(&args.split_date)
        .ok_or_else(|| SegRankError::Config(format!("Invalid split date '{}'", args.split_date)))?;

    let efforts = load_clean_efforts(&args.efforts, &config.loader)?;
    let (train_efforts, test_efforts) = split_by_date(&efforts, cutoff);
    let train_pairs = aggregate_pairs(&train_efforts);
    let test_pairs = aggregate_pairs(&test_efforts);
    info!(
        "✂️  Split at {}: {} training pairs, {} test pairs",
        cutoff,
        train_pairs.len(),
        test_pairs.len()
    );
    if test_pairs.is_empty() {
        return Err(SegRankError::EmptyDataset(format!(
            "no test efforts after {}",
            args.split_date
        )));
    }

    let model = train(&train_pairs, &config.train)?;
    let result = evaluate(&model, &test_pairs)?;
    let baseline = baseline_rmse(&train_pairs, &test_pairs);

    if args.json {
        let report = EvaluationReport {
            split_date: &args.split_date,
            train_pairs: train_pairs.len(),
            test_pairs: test_pairs.len(),
            model: result,
            baseline_rmse: baseline,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        reports::print_evaluation("test set", &result, Some(baseline));
    }
    Ok(())
}
