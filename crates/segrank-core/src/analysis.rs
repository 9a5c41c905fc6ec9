use crate::efforts::aggregate::SegmentProfile;
use crate::efforts::{segment_profiles, Effort};
use crate::error::{SegRankError, SrResult};
use crate::leaderboard::BoardType;
use crate::ratings::RatingsTable;
use serde::Serialize;

pub const SEGMENT_ATTRIBUTES: [&str; 3] = ["seg_average_grade", "seg_distance", "seg_maximum_grade"];

fn attribute(p: &SegmentProfile, name: &str) -> f64 {
    match name {
        "seg_average_grade" => p.seg_average_grade,
        "seg_distance" => p.seg_distance,
        _ => p.seg_maximum_grade,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCorrelation {
    pub column: String,
    pub attribute: &'static str,
    /// `None` when fewer than two segments or either side has no variance.
    pub r: Option<f64>,
    pub n: usize,
}

pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }
    let mx = xs.iter().sum::<f64>() / n as f64;
    let my = ys.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}

/// Correlates every segment latent column with the static segment
/// attributes. Segments without efforts are left out.
pub fn segment_feature_correlations(
    ratings: &RatingsTable,
    efforts: &[Effort],
) -> SrResult<Vec<FeatureCorrelation>> {
    if ratings.board_type() != BoardType::Segment {
        return Err(SegRankError::Validation(
            "Feature correlations need a segment ratings table".to_string(),
        ));
    }

    let profiles = segment_profiles(efforts);
    let mut out = Vec::with_capacity(ratings.columns().len() * SEGMENT_ATTRIBUTES.len());

    for column in ratings.columns() {
        let values = ratings.column(column).unwrap_or_default();
        let joined: Vec<(f64, &SegmentProfile)> = ratings
            .ids()
            .iter()
            .zip(values)
            .filter_map(|(id, v)| Some(((*v)?, profiles.get(id)?)))
            .collect();

        let xs: Vec<f64> = joined.iter().map(|(v, _)| *v).collect();
        for name in SEGMENT_ATTRIBUTES {
            let ys: Vec<f64> = joined.iter().map(|(_, p)| attribute(p, name)).collect();
            out.push(FeatureCorrelation {
                column: column.clone(),
                attribute: name,
                r: pearson(&xs, &ys),
                n: xs.len(),
            });
        }
    }
    Ok(out)
}
