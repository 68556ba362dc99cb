// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Exploratory analysis and baseline evaluation for credit-default data
//!
//! This crate provides:
//! - CSV dataset loading with lazily parsed target and numeric fields
//! - Descriptive statistics (class balance, duplicates, blanks, numeric ranges)
//! - Seeded, reproducible train/test partitioning
//! - Interpretable baseline predictors
//! - Evaluation metrics (Accuracy, Precision, Recall, F1, confusion matrix)
//! - An evaluation pipeline with JSON and markdown reporting

pub mod baselines;
pub mod datasets;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod split;
pub mod summary;

pub use baselines::{all_baselines, ConstantBaseline, CreditRiskRule, FnPredictor, Predictor};
pub use datasets::{Dataset, DatasetConfig, Label, Record};
pub use error::DatasetError;
pub use metrics::{ConfusionMatrix, Metrics};
pub use pipeline::{EvaluationConfig, EvaluationPipeline, EvaluationResults, OutputFormat};
pub use split::{train_test_split, Split};
pub use summary::DatasetSummary;
