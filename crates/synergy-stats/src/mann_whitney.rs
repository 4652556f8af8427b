// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Mann–Whitney U rank-sum test
//!
//! `U1 = R1 - n1(n1+1)/2` where `R1` is the rank sum of `x` in the pooled
//! sample (ties get average ranks).
//!
//! Method selection:
//! - exact null distribution when at least one sample has 8 or fewer values
//!   and there are no ties;
//! - otherwise the normal approximation with tie correction and a 0.5
//!   continuity correction.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::normal::normal_sf;
use crate::{StatsError, StatsResult};

const EXACT_MAX_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alternative {
    TwoSided,
    /// `x` tends to be larger than `y`
    Greater,
    /// `x` tends to be smaller than `y`
    Less,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Exact,
    Asymptotic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyResult {
    /// U statistic of the first sample
    pub u1: f64,
    pub p_value: f64,
    pub method: Method,
}

/// Run the test of `x` against `y`
pub fn mann_whitney_u(x: &[f64], y: &[f64], alternative: Alternative) -> StatsResult<MannWhitneyResult> {
    check_sample("x", x)?;
    check_sample("y", y)?;

    let n1 = x.len();
    let n2 = y.len();
    let (ranks, tie_counts) = pooled_ranks(x, y);
    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;

    let has_ties = tie_counts.iter().any(|&t| t > 1);
    let method = if (n1 > EXACT_MAX_SIZE && n2 > EXACT_MAX_SIZE) || has_ties {
        Method::Asymptotic
    } else {
        Method::Exact
    };

    // Statistic whose upper tail is tested
    let (u, factor) = match alternative {
        Alternative::TwoSided => (u1.max(u2), 2.0),
        Alternative::Greater => (u1, 1.0),
        Alternative::Less => (u2, 1.0),
    };

    let tail = match method {
        Method::Exact => exact_upper_tail(u.round() as usize, n1, n2),
        Method::Asymptotic => asymptotic_upper_tail(u, n1, n2, &tie_counts),
    };
    let p_value = (tail * factor).clamp(0.0, 1.0);

    trace!(
        target: "synergy-stats",
        "Mann-Whitney n1={} n2={} U1={} p={} ({:?})",
        n1,
        n2,
        u1,
        p_value,
        method
    );

    Ok(MannWhitneyResult { u1, p_value, method })
}

fn check_sample(name: &'static str, values: &[f64]) -> StatsResult<()> {
    if values.is_empty() {
        return Err(StatsError::EmptySample(name));
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue { sample: name, index });
    }
    Ok(())
}

/// Average ranks of `x` followed by `y`, plus the size of every tie group
fn pooled_ranks(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let mut order: Vec<usize> = (0..pooled.len()).collect();
    order.sort_by(|&a, &b| pooled[a].total_cmp(&pooled[b]));

    let mut ranks = vec![0.0; pooled.len()];
    let mut tie_counts = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && pooled[order[end]] == pooled[order[start]] {
            end += 1;
        }
        // ranks are 1-based: positions start+1 ..= end
        let average = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = average;
        }
        tie_counts.push(end - start);
        start = end;
    }

    (ranks, tie_counts)
}

/// `P(U >= u)` under the exact null distribution (no ties)
///
/// The counts of U are the coefficients of the Gaussian binomial
/// `[m+n choose m]_q`, built one factor at a time.
fn exact_upper_tail(u: usize, n1: usize, n2: usize) -> f64 {
    let m = n1.min(n2);
    let n = n1.max(n2);
    let max_u = m * n;
    if u > max_u {
        return 0.0;
    }

    // Coefficients above max_u never feed lower ones, so truncation is exact.
    // Intermediate negatives wrap and cancel out after the division.
    let mut counts = vec![0u128; max_u + 1];
    counts[0] = 1;
    for i in 1..=m {
        // multiply by (1 - q^(n+i))
        let shift = n + i;
        for k in (shift..=max_u).rev() {
            counts[k] = counts[k].wrapping_sub(counts[k - shift]);
        }
        // divide by (1 - q^i)
        for k in i..=max_u {
            counts[k] = counts[k].wrapping_add(counts[k - i]);
        }
    }

    let total: u128 = counts.iter().sum();
    let upper: u128 = counts[u..].iter().sum();
    upper as f64 / total as f64
}

/// `P(U >= u)` from the tie-corrected normal approximation
fn asymptotic_upper_tail(u: f64, n1: usize, n2: usize, tie_counts: &[usize]) -> f64 {
    let n = (n1 + n2) as f64;
    let mu = (n1 * n2) as f64 / 2.0;
    let tie_term: f64 = tie_counts
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let variance = (n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    let sigma = variance.max(0.0).sqrt();

    let numerator = u - mu - 0.5;
    if sigma == 0.0 {
        return if numerator > 0.0 { 0.0 } else { 1.0 };
    }
    normal_sf(numerator / sigma)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fully_separated() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [6.0, 7.0, 8.0, 9.0, 10.0];
        let result = mann_whitney_u(&x, &y, Alternative::TwoSided).unwrap();
        assert_eq!(result.method, Method::Exact);
        assert_eq!(result.u1, 0.0);
        assert!((result.p_value - 2.0 / 252.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_one_sided() {
        let x = [6.0, 7.0, 8.0, 9.0, 10.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let greater = mann_whitney_u(&x, &y, Alternative::Greater).unwrap();
        assert_eq!(greater.u1, 25.0);
        assert!((greater.p_value - 1.0 / 252.0).abs() < 1e-12);

        let less = mann_whitney_u(&x, &y, Alternative::Less).unwrap();
        assert!((less.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_distribution_sums_to_one() {
        assert!((exact_upper_tail(0, 3, 4) - 1.0).abs() < 1e-15);
        // U over 2x2: counts 1,1,2,1,1 for u = 0..=4
        assert!((exact_upper_tail(3, 2, 2) - 2.0 / 6.0).abs() < 1e-15);
        assert!((exact_upper_tail(2, 2, 2) - 4.0 / 6.0).abs() < 1e-15);
        assert_eq!(exact_upper_tail(5, 2, 2), 0.0);
    }

    #[test]
    fn test_exact_with_unbalanced_sizes() {
        // one sample small enough for the exact method even though the other is large
        let x = [0.5];
        let y: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let result = mann_whitney_u(&x, &y, Alternative::TwoSided).unwrap();
        assert_eq!(result.method, Method::Exact);
        assert!((result.p_value - 2.0 / 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_asymptotic_large_samples() {
        let x: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let y: Vec<f64> = (11..=20).map(|v| v as f64).collect();
        let result = mann_whitney_u(&x, &y, Alternative::TwoSided).unwrap();
        assert_eq!(result.method, Method::Asymptotic);
        assert!((result.p_value - 1.826_717_911_095_504e-4).abs() < 1e-8);
    }

    #[test]
    fn test_asymptotic_with_ties() {
        let x = [1.0, 2.0, 2.0, 3.0];
        let y = [2.0, 3.0, 3.0, 4.0, 5.0];
        let result = mann_whitney_u(&x, &y, Alternative::TwoSided).unwrap();
        assert_eq!(result.method, Method::Asymptotic);
        assert_eq!(result.u1, 3.0);
        assert!((result.p_value - 0.099_342_247_853_465_27).abs() < 1e-6);

        let x = [0.1, 0.4, 0.4, 0.9, 1.2, 1.3];
        let y = [0.2, 0.4, 0.5, 0.5, 0.6];
        let result = mann_whitney_u(&x, &y, Alternative::TwoSided).unwrap();
        assert_eq!(result.u1, 18.0);
        assert!((result.p_value - 0.644_287_613_125_406_7).abs() < 1e-6);
    }

    #[test]
    fn test_all_values_tied() {
        let result = mann_whitney_u(&[1.0; 9], &[1.0; 9], Alternative::TwoSided).unwrap();
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        assert_eq!(
            mann_whitney_u(&[], &[1.0], Alternative::TwoSided),
            Err(StatsError::EmptySample("x"))
        );
        assert_eq!(
            mann_whitney_u(&[1.0], &[2.0, f64::NAN], Alternative::TwoSided),
            Err(StatsError::NonFiniteValue { sample: "y", index: 1 })
        );
    }
}
