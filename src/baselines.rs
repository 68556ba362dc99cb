// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Predictors evaluated against the credit dataset
//!
//! Implements:
//! - Credit risk rule (interpretable heuristic on credit history and checking account)
//! - Constant baseline (always predicts one class)
//! - Function predictor (wraps any `Fn(&Record) -> Label`)
//!
//! None of these are trained; they map a record straight to a label.

use crate::datasets::{Label, Record};

/// Anything that maps a record to a label
pub trait Predictor {
    /// Predict label for a single record
    fn predict(&self, record: &Record) -> Label;

    /// Predict labels for multiple records
    fn predict_batch(&self, records: &[Record]) -> Vec<Label> {
        records.iter().map(|r| self.predict(r)).collect()
    }

    /// Get predictor name
    fn name(&self) -> &str;

    /// Get predictor description
    fn description(&self) -> &str;
}

/// One condition of [`CreditRiskRule`]: a field whose value contains a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub marker: String,
}

impl Condition {
    pub fn new(field: &str, marker: &str) -> Self {
        Self {
            field: field.to_string(),
            marker: marker.to_lowercase(),
        }
    }

    /// Case-insensitive substring match. A missing field never matches.
    pub fn matches(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .is_some_and(|v| v.to_lowercase().contains(&self.marker))
    }
}

/// Flags a default when any condition holds.
///
/// The default conditions favour recall on defaults: a critical credit
/// history or a negative checking account balance.
#[derive(Debug, Clone)]
pub struct CreditRiskRule {
    conditions: Vec<Condition>,
}

impl Default for CreditRiskRule {
    fn default() -> Self {
        Self {
            conditions: vec![
                Condition::new("historico_credito", "critical"),
                Condition::new("conta_corrente", "< 0 dm"),
            ],
        }
    }
}

impl CreditRiskRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conditions(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Conditions that fired for this record, in rule order
    pub fn explain<'a>(&'a self, record: &Record) -> Vec<&'a Condition> {
        self.conditions.iter().filter(|c| c.matches(record)).collect()
    }
}

impl Predictor for CreditRiskRule {
    fn predict(&self, record: &Record) -> Label {
        if self.conditions.iter().any(|c| c.matches(record)) {
            Label::Defaulted
        } else {
            Label::Repaid
        }
    }

    fn name(&self) -> &str {
        "CreditRiskRule"
    }

    fn description(&self) -> &str {
        "Predicts default on critical credit history or negative checking account"
    }
}

/// Always predicts the same class
#[derive(Debug, Clone, Copy)]
pub struct ConstantBaseline {
    label: Label,
}

impl ConstantBaseline {
    pub fn new(label: Label) -> Self {
        Self { label }
    }
}

impl Predictor for ConstantBaseline {
    fn predict(&self, _record: &Record) -> Label {
        self.label
    }

    fn name(&self) -> &str {
        match self.label {
            Label::Defaulted => "AlwaysDefault",
            Label::Repaid => "AlwaysRepaid",
        }
    }

    fn description(&self) -> &str {
        match self.label {
            Label::Defaulted => "Predicts default for every record",
            Label::Repaid => "Predicts repayment for every record",
        }
    }
}

/// Adapts a plain function or closure into a [`Predictor`]
pub struct FnPredictor<F> {
    name: String,
    description: String,
    f: F,
}

impl<F> FnPredictor<F>
where
    F: Fn(&Record) -> Label,
{
    pub fn new(name: &str, description: &str, f: F) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            f,
        }
    }
}

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&Record) -> Label,
{
    fn predict(&self, record: &Record) -> Label {
        (self.f)(record)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// All built-in predictors, rule first
pub fn all_baselines() -> Vec<Box<dyn Predictor>> {
    vec![
        Box::new(CreditRiskRule::new()),
        Box::new(ConstantBaseline::new(Label::Repaid)),
        Box::new(ConstantBaseline::new(Label::Defaulted)),
    ]
}
