// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Plug-in estimates of entropy, mutual information and the Williams–Beer
//! minimum specific information `I_min`.
//!
//! ```text
//! I_spec(y; A) = Σ_a p(a|y) · log2( p(a,y) / (p(a) p(y)) )
//! I_min(Y; A1..An) = Σ_y p(y) · min_i I_spec(y; Ai)
//! ```
//!
//! With a single group `I_min` reduces to the mutual information.

use ahash::AHashMap;
use ndarray::{Array2, ArrayView2};
use tracing::trace;

use crate::binning::Binning;
use crate::error::{InfoError, InfoResult};

/// Binned copy of a data matrix, one symbol table per shifted grid
#[derive(Debug, Clone)]
pub struct Estimator {
    tables: Vec<SymbolTable>,
    radix: Vec<u64>,
    n_samples: usize,
}

#[derive(Debug, Clone)]
struct SymbolTable {
    bins: Array2<u32>,
}

impl Estimator {
    /// Bin `data` (`n_samples × dims`) on every shifted grid of `binning`
    pub fn new(data: ArrayView2<'_, f64>, binning: &Binning) -> InfoResult<Self> {
        if data.nrows() == 0 {
            return Err(InfoError::EmptyData);
        }
        if data.ncols() != binning.dims() {
            return Err(InfoError::DimensionMismatch {
                expected: binning.dims(),
                actual: data.ncols(),
            });
        }

        let mut tables = Vec::with_capacity(binning.n_shifts());
        for shift in 0..binning.n_shifts() {
            let mut bins = Array2::<u32>::zeros(data.dim());
            for ((row, column), &value) in data.indexed_iter() {
                if !value.is_finite() {
                    return Err(InfoError::NonFiniteValue { row, column });
                }
                bins[[row, column]] = binning.bin_index(column, value, shift) as u32;
            }
            tables.push(SymbolTable { bins });
        }

        let radix = (0..binning.dims())
            .map(|dim| binning.radix(dim) as u64)
            .collect();

        trace!(
            target: "synergy-infotheory",
            "Binned {} samples x {} dims on {} grids",
            data.nrows(),
            data.ncols(),
            tables.len()
        );

        Ok(Self {
            tables,
            radix,
            n_samples: data.nrows(),
        })
    }

    /// Convenience: derive ranges from the data itself
    pub fn from_data(data: ArrayView2<'_, f64>, n_bins: usize, n_shifts: usize) -> InfoResult<Self> {
        let binning = Binning::from_data(data, n_bins, n_shifts)?;
        Self::new(data, &binning)
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn dims(&self) -> usize {
        self.radix.len()
    }

    /// Joint entropy `H(vars)`
    pub fn entropy(&self, vars: &[usize]) -> InfoResult<f64> {
        self.check_vars(vars)?;
        let n = self.n_samples as f64;
        self.average(|table| {
            let counts = self.joint_counts(table, vars)?;
            Ok(counts
                .values()
                .map(|&c| {
                    let p = c as f64 / n;
                    -p * p.log2()
                })
                .sum())
        })
    }

    /// Mutual information `I(target; sources)`, sources taken jointly
    pub fn mutual_info(&self, target: &[usize], sources: &[usize]) -> InfoResult<f64> {
        self.i_min(target, &[sources])
    }

    /// Williams–Beer redundancy of `groups` about `target`
    ///
    /// Each group is a set of dimensions treated as one joint source.
    pub fn i_min(&self, target: &[usize], groups: &[&[usize]]) -> InfoResult<f64> {
        self.check_vars(target)?;
        if groups.is_empty() {
            return Err(InfoError::EmptyVariableSet("source groups"));
        }
        for group in groups {
            self.check_vars(group)?;
        }

        self.average(|table| {
            let target_counts = self.joint_counts(table, target)?;
            let mut minimum: AHashMap<u64, f64> = AHashMap::new();
            for group in groups {
                let specific = self.specific_info(table, target, group, &target_counts)?;
                for (y, value) in specific {
                    minimum
                        .entry(y)
                        .and_modify(|current| *current = current.min(value))
                        .or_insert(value);
                }
            }

            let n = self.n_samples as f64;
            Ok(target_counts
                .iter()
                .map(|(y, &c_y)| {
                    let p_y = c_y as f64 / n;
                    p_y * minimum.get(y).copied().unwrap_or(0.0)
                })
                .sum())
        })
    }

    /// `I_spec(y; group)` for every observed target symbol `y`
    fn specific_info(
        &self,
        table: &SymbolTable,
        target: &[usize],
        group: &[usize],
        target_counts: &AHashMap<u64, usize>,
    ) -> InfoResult<AHashMap<u64, f64>> {
        let source_keys = self.keys(table, group)?;
        let target_keys = self.keys(table, target)?;

        let mut source_counts: AHashMap<u64, usize> = AHashMap::new();
        let mut pair_counts: AHashMap<(u64, u64), usize> = AHashMap::new();
        for (&y, &a) in target_keys.iter().zip(&source_keys) {
            *source_counts.entry(a).or_insert(0) += 1;
            *pair_counts.entry((y, a)).or_insert(0) += 1;
        }

        let n = self.n_samples as f64;
        let mut specific: AHashMap<u64, f64> = AHashMap::with_capacity(target_counts.len());
        for (&(y, a), &c_ay) in &pair_counts {
            let c_y = target_counts[&y] as f64;
            let c_a = source_counts[&a] as f64;
            let c_ay = c_ay as f64;
            let term = (c_ay / c_y) * (c_ay * n / (c_a * c_y)).log2();
            *specific.entry(y).or_insert(0.0) += term;
        }
        Ok(specific)
    }

    fn joint_counts(&self, table: &SymbolTable, vars: &[usize]) -> InfoResult<AHashMap<u64, usize>> {
        let mut counts = AHashMap::new();
        for key in self.keys(table, vars)? {
            *counts.entry(key).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Mixed-radix encoding of each row's bins over `vars`
    fn keys(&self, table: &SymbolTable, vars: &[usize]) -> InfoResult<Vec<u64>> {
        let mut capacity: u64 = 1;
        for &var in vars {
            capacity = capacity
                .checked_mul(self.radix[var])
                .ok_or(InfoError::SymbolOverflow(vars.len()))?;
        }

        Ok(table
            .bins
            .rows()
            .into_iter()
            .map(|row| {
                vars.iter()
                    .fold(0u64, |key, &var| key * self.radix[var] + row[var] as u64)
            })
            .collect())
    }

    fn check_vars(&self, vars: &[usize]) -> InfoResult<()> {
        if vars.is_empty() {
            return Err(InfoError::EmptyVariableSet("variables"));
        }
        for &index in vars {
            if index >= self.dims() {
                return Err(InfoError::VariableOutOfRange {
                    index,
                    dims: self.dims(),
                });
            }
        }
        Ok(())
    }

    fn average<F>(&self, per_table: F) -> InfoResult<f64>
    where
        F: Fn(&SymbolTable) -> InfoResult<f64>,
    {
        let mut total = 0.0;
        for table in &self.tables {
            total += per_table(table)?;
        }
        Ok(total / self.tables.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn binary(rows: &[[f64; 3]]) -> Estimator {
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), 3), flat).unwrap();
        Estimator::from_data(data.view(), 10, 3).unwrap()
    }

    #[test]
    fn test_entropy_of_fair_bits() {
        let est = binary(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
        ]);
        assert!((est.entropy(&[0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((est.entropy(&[0, 1]).unwrap() - 2.0).abs() < 1e-12);
        assert!((est.entropy(&[0, 1, 2]).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mutual_info_identity_and_independence() {
        let est = binary(&[
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
        ]);
        assert!((est.mutual_info(&[0], &[1]).unwrap() - 1.0).abs() < 1e-12);
        assert!(est.mutual_info(&[0], &[2]).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_i_min_single_group_is_mutual_info() {
        let data = array![
            [0.0, 3.0, 1.0],
            [1.0, 2.0, 5.0],
            [2.0, 2.0, 4.0],
            [0.0, 1.0, 1.0],
            [4.0, 0.0, 2.0],
            [3.0, 3.0, 2.0],
        ];
        let est = Estimator::from_data(data.view(), 4, 2).unwrap();
        let mi = est.mutual_info(&[0], &[1, 2]).unwrap();
        let h_y = est.entropy(&[0]).unwrap();
        let h_a = est.entropy(&[1, 2]).unwrap();
        let h_ya = est.entropy(&[0, 1, 2]).unwrap();
        assert!((mi - (h_y + h_a - h_ya)).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_variables() {
        let est = binary(&[[0.0, 1.0, 0.0], [1.0, 0.0, 1.0]]);
        assert_eq!(
            est.mutual_info(&[0], &[3]),
            Err(InfoError::VariableOutOfRange { index: 3, dims: 3 })
        );
        assert!(est.entropy(&[]).is_err());
        assert!(est.i_min(&[0], &[]).is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        let data = array![[0.0, 1.0], [1.0, 0.0]];
        let binning = Binning::equal_interval(&[2, 2, 2], &[0.0; 3], &[1.0; 3], 1).unwrap();
        assert!(matches!(
            Estimator::new(data.view(), &binning),
            Err(InfoError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }
}
