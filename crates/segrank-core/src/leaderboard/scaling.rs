/// Score given to every entity of a column with no spread.
pub const UNIFORM_SCORE: f64 = 50.0;

/// Multiplies the column by `multiplier`, then min-max rescales the present
/// values into `[0, 100]`. Missing values stay missing.
///
/// When every present value is equal there is nothing to rank, and all of
/// them get [`UNIFORM_SCORE`].
pub fn scale_column(values: &[Option<f64>], multiplier: f64) -> Vec<Option<f64>> {
    let signed: Vec<Option<f64>> = values.iter().map(|v| v.map(|x| x * multiplier)).collect();

    let min = signed
        .iter()
        .flatten()
        .copied()
        .fold(f64::INFINITY, f64::min);
    if !min.is_finite() {
        return signed;
    }

    let max = signed
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    // Finite values of opposite sign can still overflow `max - min`; halve
    // both ends first in that case.
    let halve = !(max - min).is_finite();
    let shift = |x: f64| if halve { x / 2.0 - min / 2.0 } else { x - min };
    let range = shift(max);

    signed
        .into_iter()
        .map(|v| {
            v.map(|x| {
                if range > 0.0 {
                    (shift(x) / range * 100.0).clamp(0.0, 100.0)
                } else {
                    UNIFORM_SCORE
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_to_full_range() {
        let out = scale_column(&[Some(2.0), Some(4.0), Some(3.0)], 1.0);
        assert_eq!(out, vec![Some(0.0), Some(100.0), Some(50.0)]);
    }

    #[test]
    fn test_negative_multiplier_flips() {
        let out = scale_column(&[Some(2.0), Some(4.0), Some(3.0)], -1.0);
        assert_eq!(out, vec![Some(100.0), Some(0.0), Some(50.0)]);
    }

    #[test]
    fn test_missing_preserved() {
        let out = scale_column(&[None, Some(-1.0), Some(1.0), None], 1.0);
        assert_eq!(out, vec![None, Some(0.0), Some(100.0), None]);
    }

    #[test]
    fn test_zero_variance_is_uniform() {
        let out = scale_column(&[Some(0.7), None, Some(0.7)], -1.0);
        assert_eq!(out, vec![Some(UNIFORM_SCORE), None, Some(UNIFORM_SCORE)]);
    }

    #[test]
    fn test_extreme_opposite_signs_stay_finite() {
        let out = scale_column(&[Some(-1.7e308), Some(0.0), Some(1.7e308)], 1.0);
        assert_eq!(out, vec![Some(0.0), Some(50.0), Some(100.0)]);
    }

    #[test]
    fn test_all_missing() {
        let out = scale_column(&[None, None], 1.0);
        assert_eq!(out, vec![None, None]);
    }
}
