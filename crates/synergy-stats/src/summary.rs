// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// True when every value is identical (an empty slice counts as single-valued)
pub fn has_single_value(values: &[f64]) -> bool {
    match values.split_first() {
        Some((first, rest)) => rest.iter().all(|v| v == first),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        let std = sample_std(&values).unwrap();
        assert!((std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_small_samples() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[3.0]), None);
        assert_eq!(sample_std(&[1.0, 1.0]), Some(0.0));
    }

    #[test]
    fn test_single_value_detection() {
        assert!(has_single_value(&[0.25, 0.25, 0.25]));
        assert!(!has_single_value(&[0.25, 0.2500001]));
        assert!(has_single_value(&[]));
    }
}
