use super::Effort;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// Drops efforts whose speed lies `sigma` or more standard deviations from
/// their segment's mean speed. Segments with fewer than two efforts, or with
/// no spread at all, keep every effort.
pub fn remove_outliers(efforts: Vec<Effort>, sigma: f64) -> Vec<Effort> {
    let mut stats: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
    for e in &efforts {
        stats.entry(e.segment_id).or_default().push(e.average_speed);
    }

    // (mean, sample std) per segment
    let bounds: BTreeMap<u64, (f64, f64)> = stats
        .into_iter()
        .filter(|(_, speeds)| speeds.len() > 1)
        .map(|(id, speeds)| {
            let n = speeds.len() as f64;
            let mean = speeds.iter().sum::<f64>() / n;
            let var = speeds.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
            (id, (mean, var.sqrt()))
        })
        .collect();

    let before = efforts.len();
    let kept: Vec<Effort> = efforts
        .into_iter()
        .filter(|e| match bounds.get(&e.segment_id) {
            Some(&(mean, std)) if std > 0.0 => (e.average_speed - mean).abs() < sigma * std,
            _ => true,
        })
        .collect();

    info!(
        "Outlier filter ({:.1}σ) removed {} of {} efforts",
        sigma,
        before - kept.len(),
        before
    );
    kept
}

/// Splits efforts at `date` into a training half (on or before) and a
/// testing half (after). The testing half keeps only athletes who also
/// appear in the training half.
pub fn split_by_date(efforts: &[Effort], date: NaiveDateTime) -> (Vec<Effort>, Vec<Effort>) {
    let (train, test): (Vec<Effort>, Vec<Effort>) =
        efforts.iter().cloned().partition(|e| e.date <= date);

    let in_train: HashSet<u64> = train.iter().map(|e| e.athlete_id).collect();
    let test = test
        .into_iter()
        .filter(|e| in_train.contains(&e.athlete_id))
        .collect();

    (train, test)
}
