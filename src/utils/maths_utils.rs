use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

/// Index of the largest value. `None` for an empty slice.
pub fn argmax(vec: &[f64]) -> Option<usize> {
    if vec.is_empty() {
        return None;
    }
    Some(vec.argmax())
}

/// Index of the smallest value. `None` for an empty slice.
pub fn argmin(vec: &[f64]) -> Option<usize> {
    if vec.is_empty() {
        return None;
    }
    Some(vec.argmin())
}

pub fn get_max(vec: &[f64]) -> Option<f64> {
    argmax(vec).map(|i| vec[i])
}

pub fn get_min(vec: &[f64]) -> Option<f64> {
    argmin(vec).map(|i| vec[i])
}

/// Arithmetic mean; `None` for an empty slice (statrs would hand back NaN).
pub fn mean(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    Some(vec.iter().mean())
}

/// Clamp to the unit interval, mapping NaN to 0.0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// `|a - b|` relative to `reference`. Infinite when the reference is not positive.
pub fn relative_diff(a: f64, b: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        (a - b).abs() / reference
    } else {
        f64::INFINITY
    }
}

/// Weighted average of `(score, weight)` pairs, `fallback` if the weights sum to zero.
pub fn weighted_average(pairs: &[(f64, f64)], fallback: f64) -> f64 {
    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return fallback;
    }
    pairs.iter().map(|(s, w)| s * w).sum::<f64>() / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_and_mean() {
        let v = [3.0, 9.0, -1.0, 4.0];
        assert_eq!(argmax(&v), Some(1));
        assert_eq!(get_min(&v), Some(-1.0));
        assert_eq!(mean(&v), Some(3.75));
        assert_eq!(get_max(&[]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn clamp_and_weighted_average() {
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        let avg = weighted_average(&[(1.0, 0.3), (0.0, 0.7)], 0.5);
        assert!((avg - 0.3).abs() < 1e-12);
        assert_eq!(weighted_average(&[], 0.5), 0.5);
    }

    #[test]
    fn relative_diff_guards_zero_reference() {
        assert!((relative_diff(100.1, 100.0, 100.05) - 0.1 / 100.05).abs() < 1e-12);
        assert!(relative_diff(1.0, 2.0, 0.0).is_infinite());
    }
}
