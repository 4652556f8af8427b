// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Equal-interval binning with averaged shifted grids
//!
//! Each dimension is split into `n_bins` equal-width bins between its
//! minimum and maximum. Shift `r` (of `n_shifts`) moves every edge left by
//! `r * width / n_shifts`, so shifted grids need one extra bin at the top.
//! Estimates computed on every grid are averaged by [`crate::Estimator`].

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::{InfoError, InfoResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    n_bins: Vec<usize>,
    mins: Vec<f64>,
    maxs: Vec<f64>,
    n_shifts: usize,
}

impl Binning {
    /// Explicit per-dimension bin counts and ranges
    pub fn equal_interval(
        n_bins: &[usize],
        mins: &[f64],
        maxs: &[f64],
        n_shifts: usize,
    ) -> InfoResult<Self> {
        let dims = n_bins.len();
        if dims == 0 {
            return Err(InfoError::InvalidBinning("no dimensions".to_string()));
        }
        for len in [mins.len(), maxs.len()] {
            if len != dims {
                return Err(InfoError::DimensionMismatch {
                    expected: dims,
                    actual: len,
                });
            }
        }
        if n_shifts == 0 {
            return Err(InfoError::InvalidBinning(
                "n_shifts must be at least 1".to_string(),
            ));
        }
        for (dim, ((&bins, &lo), &hi)) in n_bins.iter().zip(mins).zip(maxs).enumerate() {
            if bins == 0 {
                return Err(InfoError::InvalidBinning(format!(
                    "dimension {} has zero bins",
                    dim
                )));
            }
            if !lo.is_finite() || !hi.is_finite() || hi < lo {
                return Err(InfoError::InvalidBinning(format!(
                    "dimension {} has invalid range [{}, {}]",
                    dim, lo, hi
                )));
            }
        }

        Ok(Self {
            n_bins: n_bins.to_vec(),
            mins: mins.to_vec(),
            maxs: maxs.to_vec(),
            n_shifts,
        })
    }

    /// Same number of bins for every column, ranges taken from the data
    pub fn from_data(data: ArrayView2<'_, f64>, n_bins: usize, n_shifts: usize) -> InfoResult<Self> {
        if data.nrows() == 0 {
            return Err(InfoError::EmptyData);
        }

        let mut mins = Vec::with_capacity(data.ncols());
        let mut maxs = Vec::with_capacity(data.ncols());
        for (column_index, column) in data.columns().into_iter().enumerate() {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for (row, &value) in column.iter().enumerate() {
                if !value.is_finite() {
                    return Err(InfoError::NonFiniteValue {
                        row,
                        column: column_index,
                    });
                }
                lo = lo.min(value);
                hi = hi.max(value);
            }
            mins.push(lo);
            maxs.push(hi);
        }

        Self::equal_interval(&vec![n_bins; data.ncols()], &mins, &maxs, n_shifts)
    }

    pub fn dims(&self) -> usize {
        self.n_bins.len()
    }

    pub fn n_shifts(&self) -> usize {
        self.n_shifts
    }

    /// Largest bin index + 1 that any grid can produce for `dim`
    pub fn radix(&self, dim: usize) -> usize {
        if self.n_shifts > 1 {
            self.n_bins[dim] + 1
        } else {
            self.n_bins[dim]
        }
    }

    /// Bin of `value` in dimension `dim` on shifted grid `shift`
    ///
    /// Values outside the configured range are clamped into the edge bins.
    pub fn bin_index(&self, dim: usize, value: f64, shift: usize) -> usize {
        let bins = self.n_bins[dim];
        let range = self.maxs[dim] - self.mins[dim];
        if range <= 0.0 {
            return 0;
        }

        let width = range / bins as f64;
        let offset = shift as f64 * width / self.n_shifts as f64;
        let raw = ((value - self.mins[dim] + offset) / width).floor();

        let top = if shift == 0 { bins - 1 } else { bins };
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(top)
        }
    }
}
