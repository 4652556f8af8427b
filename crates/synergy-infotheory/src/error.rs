// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Result type for information-theoretic operations
pub type InfoResult<T> = Result<T, InfoError>;

/// Errors raised while binning data or estimating information terms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InfoError {
    #[error("No samples to estimate from")]
    EmptyData,

    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Variable index {index} out of range for {dims} dimensions")]
    VariableOutOfRange { index: usize, dims: usize },

    #[error("Non-finite value at row {row}, column {column}")]
    NonFiniteValue { row: usize, column: usize },

    #[error("Empty variable set: {0}")]
    EmptyVariableSet(&'static str),

    #[error("Invalid binning: {0}")]
    InvalidBinning(String),

    #[error("Too many joint dimensions to encode: {0}")]
    SymbolOverflow(usize),
}
