// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Partial information decomposition on the Williams–Beer redundancy lattice
//!
//! Two sources:
//! ```text
//! R   = I_min(Y; {1}{2})
//! U_i = I(Y; X_i) - R
//! S   = I(Y; X1 X2) - U1 - U2 - R
//! ```
//!
//! Three sources (atoms of the full lattice):
//! ```text
//! R   = I_min(Y; {1}{2}{3})
//! U_i = I(Y; X_i) - I_min(Y; {i}{jk})
//! S   = I(Y; 123) - [ I(12) + I(13) + I(23)
//!                     - I_min(12,13) - I_min(12,23) - I_min(13,23)
//!                     + I_min(12,13,23) ]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::InfoResult;
use crate::estimator::Estimator;

/// Two-source decomposition
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pid2 {
    pub mi: f64,
    pub redundancy: f64,
    pub synergy: f64,
    pub unique: [f64; 2],
}

/// Three-source decomposition
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pid3 {
    pub mi: f64,
    pub redundancy: f64,
    pub synergy: f64,
    pub unique: [f64; 3],
}

impl Pid2 {
    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            mi: round_to(self.mi, decimals),
            redundancy: round_to(self.redundancy, decimals),
            synergy: round_to(self.synergy, decimals),
            unique: self.unique.map(|u| round_to(u, decimals)),
        }
    }
}

impl Pid3 {
    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            mi: round_to(self.mi, decimals),
            redundancy: round_to(self.redundancy, decimals),
            synergy: round_to(self.synergy, decimals),
            unique: self.unique.map(|u| round_to(u, decimals)),
        }
    }
}

/// Round to `decimals` places, ties to even
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Decompose `I(target; x1, x2)`
pub fn decompose2(est: &Estimator, target: usize, x1: usize, x2: usize) -> InfoResult<Pid2> {
    let y = [target];
    let mi = est.mutual_info(&y, &[x1, x2])?;
    let i1 = est.mutual_info(&y, &[x1])?;
    let i2 = est.mutual_info(&y, &[x2])?;
    let singles: [&[usize]; 2] = [&[x1], &[x2]];
    let redundancy = est.i_min(&y, &singles)?;

    let u1 = i1 - redundancy;
    let u2 = i2 - redundancy;
    Ok(Pid2 {
        mi,
        redundancy,
        synergy: mi - u1 - u2 - redundancy,
        unique: [u1, u2],
    })
}

/// Decompose `I(target; x1, x2, x3)`
pub fn decompose3(
    est: &Estimator,
    target: usize,
    x1: usize,
    x2: usize,
    x3: usize,
) -> InfoResult<Pid3> {
    let y = [target];
    let mi = est.mutual_info(&y, &[x1, x2, x3])?;
    let singles: [&[usize]; 3] = [&[x1], &[x2], &[x3]];
    let redundancy = est.i_min(&y, &singles)?;

    let sources = [x1, x2, x3];
    let mut unique = [0.0; 3];
    for (i, slot) in unique.iter_mut().enumerate() {
        let own = [sources[i]];
        let rest: Vec<usize> = sources
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, &v)| v)
            .collect();
        let pair: [&[usize]; 2] = [&own, &rest];
        *slot = est.mutual_info(&y, &own)? - est.i_min(&y, &pair)?;
    }

    let p12: &[usize] = &[x1, x2];
    let p13: &[usize] = &[x1, x3];
    let p23: &[usize] = &[x2, x3];
    let pairs_union = est.mutual_info(&y, p12)?
        + est.mutual_info(&y, p13)?
        + est.mutual_info(&y, p23)?
        - est.i_min(&y, &[p12, p13])?
        - est.i_min(&y, &[p12, p23])?
        - est.i_min(&y, &[p13, p23])?
        + est.i_min(&y, &[p12, p13, p23])?;

    Ok(Pid3 {
        mi,
        redundancy,
        synergy: mi - pairs_union,
        unique,
    })
}
