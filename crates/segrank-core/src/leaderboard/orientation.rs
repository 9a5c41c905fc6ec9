use std::collections::BTreeMap;
use tracing::warn;

/// How a raw latent scale relates to observed speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The top-rated entity is faster than the average entity.
    SpeedAligned,
    /// The top-rated entity is no faster than the average entity.
    SpeedOpposed,
}

impl Orientation {
    pub fn sign(self) -> f64 {
        match self {
            Orientation::SpeedAligned => -1.0,
            Orientation::SpeedOpposed => 1.0,
        }
    }
}

/// Judges a column by its top-rated entity: is that entity's mean speed
/// above the mean of all per-entity mean speeds in `speeds`?
///
/// Only entities present in `speeds` are candidates for "top-rated"; ties
/// go to the earliest row. With no candidate at all the column is treated
/// as [`Orientation::SpeedOpposed`].
pub fn detect_orientation(
    column: &str,
    ids: &[u64],
    values: &[Option<f64>],
    speeds: &BTreeMap<u64, f64>,
) -> Orientation {
    let mut best: Option<(u64, f64)> = None;
    for (&id, v) in ids.iter().zip(values) {
        let Some(v) = *v else { continue };
        if !speeds.contains_key(&id) {
            continue;
        }
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((id, v));
        }
    }

    let Some((best_id, _)) = best else {
        warn!(
            "⚠️  Column '{}' has no rated entity with matching efforts; keeping raw orientation",
            column
        );
        return Orientation::SpeedOpposed;
    };

    let overall = speeds.values().sum::<f64>() / speeds.len() as f64;
    if speeds[&best_id] > overall {
        Orientation::SpeedAligned
    } else {
        Orientation::SpeedOpposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speeds(pairs: &[(u64, f64)]) -> BTreeMap<u64, f64> {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_fast_leader_is_aligned() {
        let s = speeds(&[(1, 5.0), (2, 9.0), (3, 7.0)]);
        let o = detect_orientation("r", &[1, 2, 3], &[Some(0.1), Some(0.9), Some(0.5)], &s);
        assert_eq!(o, Orientation::SpeedAligned);
    }

    #[test]
    fn test_slow_leader_is_opposed() {
        let s = speeds(&[(1, 5.0), (2, 9.0), (3, 7.0)]);
        let o = detect_orientation("r", &[1, 2, 3], &[Some(0.9), Some(0.1), Some(0.5)], &s);
        assert_eq!(o, Orientation::SpeedOpposed);
    }

    #[test]
    fn test_leader_without_speed_is_skipped() {
        // Entity 4 has the highest rating but no efforts, so entity 2 decides.
        let s = speeds(&[(1, 5.0), (2, 9.0)]);
        let o = detect_orientation(
            "r",
            &[1, 2, 4],
            &[Some(0.1), Some(0.5), Some(3.0)],
            &s,
        );
        assert_eq!(o, Orientation::SpeedAligned);
    }

    #[test]
    fn test_no_candidates() {
        let s = speeds(&[(1, 5.0)]);
        let o = detect_orientation("r", &[2], &[Some(1.0)], &s);
        assert_eq!(o, Orientation::SpeedOpposed);
    }
}
