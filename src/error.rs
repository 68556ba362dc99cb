// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Errors raised while loading, parsing and partitioning credit records

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

/// Failures surfaced by the dataset layer
///
/// Row numbers are 1-based and count data rows only (the header is excluded).
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset not found at: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: missing field '{field}'")]
    MissingField { row: usize, field: String },

    #[error("Row {row}: target value '{value}' is not a binary label (expected 0 or 1)")]
    InvalidTarget { row: usize, value: String },

    #[error("Row {row}: field '{field}' has non-numeric value '{value}'")]
    InvalidNumber {
        row: usize,
        field: String,
        value: String,
    },

    #[error("Test size must be within [0, 1], got {0}")]
    InvalidTestSize(f64),
}
