// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Binary classification metrics
//!
//! Implements:
//! - Confusion Matrix
//! - Accuracy, Precision, Recall, F1-Score
//!
//! Every ratio is zero-guarded: an empty denominator yields 0.0, never NaN.

use crate::datasets::Label;
use serde::{Deserialize, Serialize};

/// Confusion matrix for binary classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// True Positives (defaults correctly flagged)
    pub tp: usize,
    /// True Negatives (repaid loans correctly cleared)
    pub tn: usize,
    /// False Positives (repaid loans flagged as default)
    pub fp: usize,
    /// False Negatives (defaults missed)
    pub fn_: usize,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl ConfusionMatrix {
    /// Tally ground truth against predictions, pairing positionally.
    ///
    /// Sequences of different length are truncated to the shorter one.
    pub fn from_labels(y_true: &[Label], y_pred: &[Label]) -> Self {
        if y_true.len() != y_pred.len() {
            tracing::warn!(
                "Label sequences differ in length (truth={}, predicted={}), comparing the first {}",
                y_true.len(),
                y_pred.len(),
                y_true.len().min(y_pred.len())
            );
        }

        let mut matrix = Self::default();

        for (truth, pred) in y_true.iter().zip(y_pred.iter()) {
            match (truth, pred) {
                (Label::Defaulted, Label::Defaulted) => matrix.tp += 1,
                (Label::Repaid, Label::Repaid) => matrix.tn += 1,
                (Label::Repaid, Label::Defaulted) => matrix.fp += 1,
                (Label::Defaulted, Label::Repaid) => matrix.fn_ += 1,
            }
        }

        matrix
    }

    /// Total number of compared pairs
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Accuracy: (TP + TN) / Total
    pub fn accuracy(&self) -> f64 {
        ratio((self.tp + self.tn) as f64, self.total() as f64)
    }

    /// Precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.tp as f64, (self.tp + self.fp) as f64)
    }

    /// Recall (Sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(self.tp as f64, (self.tp + self.fn_) as f64)
    }

    /// Specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(self.tn as f64, (self.tn + self.fp) as f64)
    }

    /// F1 Score: 2 * (Precision * Recall) / (Precision + Recall)
    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        ratio(2.0 * precision * recall, precision + recall)
    }
}

/// Evaluation result: confusion counts plus the derived ratios.
///
/// Built once per evaluation and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl Metrics {
    pub fn from_confusion_matrix(cm: &ConfusionMatrix) -> Self {
        Self {
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1_score(),
            tp: cm.tp,
            tn: cm.tn,
            fp: cm.fp,
            fn_: cm.fn_,
        }
    }

    /// Compare ground truth against predictions
    pub fn from_labels(y_true: &[Label], y_pred: &[Label]) -> Self {
        Self::from_confusion_matrix(&ConfusionMatrix::from_labels(y_true, y_pred))
    }

    pub fn confusion_matrix(&self) -> ConfusionMatrix {
        ConfusionMatrix {
            tp: self.tp,
            tn: self.tn,
            fp: self.fp,
            fn_: self.fn_,
        }
    }

    pub fn support(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Format as a human-readable block
    pub fn format(&self) -> String {
        format!(
            r#"- Accuracy:  {:.3}
- Precision: {:.3}
- Recall:    {:.3}
- F1-score:  {:.3}
- Confusion matrix:
  TP={} | FP={}
  FN={} | TN={}
"#,
            self.accuracy, self.precision, self.recall, self.f1, self.tp, self.fp, self.fn_, self.tn,
        )
    }
}
