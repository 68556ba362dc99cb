// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Descriptive statistics over loaded records

use crate::datasets::{Dataset, Label, Record};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Mean/min/max of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    /// Non-blank values that were parsed
    pub count: usize,
    /// Blank cells skipped
    pub missing: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    fn from_values(column: &str, values: &[f64], missing: usize) -> Self {
        let (mean, min, max) = if values.is_empty() {
            (None, None, None)
        } else {
            let sum: f64 = values.iter().sum();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (Some(sum / values.len() as f64), Some(min), Some(max))
        };

        Self {
            column: column.to_string(),
            count: values.len(),
            missing,
            mean,
            min,
            max,
        }
    }

    pub fn format(&self) -> String {
        match (self.mean, self.min, self.max) {
            (Some(mean), Some(min), Some(max)) => format!(
                "- {}: mean={:.2} | min={:.2} | max={:.2}",
                self.column, mean, min, max
            ),
            _ => format!("- {}: no values", self.column),
        }
    }
}

/// Count of each target class. Fails on the first malformed target.
pub fn target_distribution(records: &[Record], target: &str) -> Result<BTreeMap<Label, usize>> {
    let mut dist = BTreeMap::new();
    for record in records {
        *dist.entry(record.label(target)?).or_insert(0) += 1;
    }
    Ok(dist)
}

/// Number of rows that exactly repeat an earlier row
pub fn duplicate_rows(records: &[Record]) -> usize {
    let distinct: HashSet<Vec<(&str, &str)>> = records
        .iter()
        .map(|r| {
            let mut fields: Vec<(&str, &str)> = r.fields().collect();
            fields.sort_unstable();
            fields
        })
        .collect();
    records.len() - distinct.len()
}

/// Number of cells that are empty after trimming
pub fn missing_values(records: &[Record]) -> usize {
    records
        .iter()
        .flat_map(|r| r.fields())
        .filter(|(_, v)| v.trim().is_empty())
        .count()
}

pub fn describe_numeric(records: &[Record], columns: &[String]) -> Result<Vec<NumericSummary>> {
    columns
        .iter()
        .map(|column| {
            let mut values = Vec::with_capacity(records.len());
            let mut missing = 0;
            for record in records {
                match record.numeric(column)? {
                    Some(v) => values.push(v),
                    None => missing += 1,
                }
            }
            Ok(NumericSummary::from_values(column, &values, missing))
        })
        .collect()
}

/// Exploratory overview of a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub target_distribution: BTreeMap<Label, usize>,
    pub duplicate_rows: usize,
    pub missing_values: usize,
    pub numeric: Vec<NumericSummary>,
}

impl DatasetSummary {
    /// Summarise `dataset`, reading class balance from the `target` column
    pub fn compute(dataset: &Dataset, target: &str, numeric_columns: &[String]) -> Result<Self> {
        let records = &dataset.records;
        Ok(Self {
            records: records.len(),
            target_distribution: target_distribution(records, target)?,
            duplicate_rows: duplicate_rows(records),
            missing_values: missing_values(records),
            numeric: describe_numeric(records, numeric_columns)?,
        })
    }

    pub fn format(&self) -> String {
        let distribution: Vec<String> = self
            .target_distribution
            .iter()
            .map(|(label, count)| format!("{}: {}", label, count))
            .collect();

        let mut out = String::new();
        out.push_str(&format!("Records loaded: {}\n", self.records));
        out.push_str(&format!("Target distribution: {{{}}}\n", distribution.join(", ")));
        out.push_str(&format!("Exact duplicate rows: {}\n", self.duplicate_rows));
        out.push_str(&format!("Empty values: {}\n", self.missing_values));

        if !self.numeric.is_empty() {
            out.push_str("\nNumeric summary:\n");
            for summary in &self.numeric {
                out.push_str(&summary.format());
                out.push('\n');
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::DatasetConfig;

    const CSV: &str = "\
default,idade,valor_emprestimo,obs
0,30,1000,
1,40,,x
0,30,1000,
1,50,3000,y
";

    fn dataset() -> Dataset {
        Dataset::from_reader(CSV.as_bytes(), DatasetConfig::default()).unwrap()
    }

    #[test]
    fn test_target_distribution() {
        let ds = dataset();
        let dist = target_distribution(&ds.records, "default").unwrap();

        assert_eq!(dist.get(&Label::Repaid), Some(&2));
        assert_eq!(dist.get(&Label::Defaulted), Some(&2));
    }

    #[test]
    fn test_duplicates_and_missing() {
        let ds = dataset();

        assert_eq!(duplicate_rows(&ds.records), 1);
        // two blank "obs" cells and one blank "valor_emprestimo"
        assert_eq!(missing_values(&ds.records), 3);
    }

    #[test]
    fn test_describe_numeric_skips_blanks() {
        let ds = dataset();
        let cols = vec!["idade".to_string(), "valor_emprestimo".to_string()];
        let stats = describe_numeric(&ds.records, &cols).unwrap();

        assert_eq!(stats[0].count, 4);
        assert!((stats[0].mean.unwrap() - 37.5).abs() < 1e-9);
        assert_eq!(stats[0].min, Some(30.0));
        assert_eq!(stats[0].max, Some(50.0));

        assert_eq!(stats[1].count, 3);
        assert_eq!(stats[1].missing, 1);
        assert!(stats[0].format().contains("mean=37.50"));
    }

    #[test]
    fn test_describe_numeric_rejects_text_and_handles_empty() {
        let ds = dataset();
        let cols = vec!["obs".to_string()];
        // "x" and "y" are not numbers
        assert!(describe_numeric(&ds.records, &cols).is_err());

        let empty = describe_numeric(&[], &cols).unwrap();
        assert_eq!(empty[0].mean, None);
        assert!(empty[0].format().contains("no values"));
    }

    #[test]
    fn test_summary_compute() {
        let ds = dataset();
        let summary = DatasetSummary::compute(&ds, "default", &["idade".to_string()]).unwrap();

        assert_eq!(summary.records, 4);
        let text = summary.format();
        assert!(text.contains("Records loaded: 4"));
        assert!(text.contains("{0: 2, 1: 2}"));
        assert!(text.contains("Exact duplicate rows: 1"));
    }
}
