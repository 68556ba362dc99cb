// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Dataset loading for credit-default evaluation
//!
//! Records are kept as raw strings in CSV column order. The target field is
//! parsed into a [`Label`] and numeric fields into `f64` only when asked for.

use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Binary credit outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Loan was repaid (encoded as 0)
    Repaid,
    /// Borrower defaulted (encoded as 1)
    Defaulted,
}

impl Label {
    /// Convert to the numeric encoding used in the dataset
    pub fn to_binary(&self) -> u8 {
        match self {
            Label::Repaid => 0,
            Label::Defaulted => 1,
        }
    }

    /// Create from binary prediction (1 = default, anything else = repaid)
    pub fn from_binary(value: u8) -> Self {
        if value == 1 {
            Label::Defaulted
        } else {
            Label::Repaid
        }
    }

    /// Strict parse of a target cell. Accepts any integer text, but only 0 and 1 are labels.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i64>().ok()? {
            0 => Some(Label::Repaid),
            1 => Some(Label::Defaulted),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_binary())
    }
}

/// A single CSV row: field names (shared across the dataset) and their raw values
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    row: usize,
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Build a record for data row `row` (1-based). Values beyond the header are dropped,
    /// missing trailing values read as absent fields.
    pub fn new(row: usize, headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self { row, headers, values }
    }

    /// Convenience constructor from `(field, value)` pairs
    pub fn from_pairs(row: usize, pairs: &[(&str, &str)]) -> Self {
        let headers: Arc<[String]> = pairs.iter().map(|(k, _)| k.to_string()).collect();
        let values = pairs.iter().map(|(_, v)| v.to_string()).collect();
        Self::new(row, headers, values)
    }

    /// 1-based data row number in the source file
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == field)?;
        self.values.get(idx).map(String::as_str)
    }

    /// Fields in column order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len().min(self.headers.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the field is absent or blank
    pub fn is_missing(&self, field: &str) -> bool {
        self.get(field).map_or(true, |v| v.trim().is_empty())
    }

    fn require(&self, field: &str) -> Result<&str> {
        self.get(field).ok_or_else(|| DatasetError::MissingField {
            row: self.row,
            field: field.to_string(),
        })
    }

    /// Parse the target field into a label
    pub fn label(&self, target: &str) -> Result<Label> {
        let value = self.require(target)?;
        Label::parse(value).ok_or_else(|| DatasetError::InvalidTarget {
            row: self.row,
            value: value.to_string(),
        })
    }

    /// Parse a numeric field. Blank cells are `None`.
    pub fn numeric(&self, field: &str) -> Result<Option<f64>> {
        let value = self.require(field)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<f64>()
            .map(Some)
            .map_err(|_| DatasetError::InvalidNumber {
                row: self.row,
                field: field.to_string(),
                value: value.to_string(),
            })
    }
}

/// Where to read a dataset from and which column holds the target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    pub path: PathBuf,
    pub target_field: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name: "German Credit (translated)".to_string(),
            path: PathBuf::from("translated_database.csv"),
            target_field: "default".to_string(),
        }
    }
}

/// A loaded dataset, held fully in memory
#[derive(Debug, Clone)]
pub struct Dataset {
    pub config: DatasetConfig,
    pub headers: Arc<[String]>,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Load the CSV file named by `config.path`
    pub fn load_csv(config: DatasetConfig) -> Result<Self> {
        if !config.path.exists() {
            return Err(DatasetError::NotFound { path: config.path });
        }

        let file = File::open(&config.path)?;
        let dataset = Self::from_reader(file, config)?;

        tracing::info!(
            "Loaded {} records ({} columns) from {}",
            dataset.len(),
            dataset.headers.len(),
            dataset.config.path.display()
        );

        Ok(dataset)
    }

    /// Parse CSV (with header row) from any reader
    pub fn from_reader<R: Read>(reader: R, config: DatasetConfig) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Arc<[String]> = reader.headers()?.iter().map(str::to_string).collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let row = result?;
            let values = row.iter().map(str::to_string).collect();
            records.push(Record::new(idx + 1, Arc::clone(&headers), values));
        }

        Ok(Self {
            config,
            headers,
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.headers.iter().any(|h| h == field)
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Ground-truth labels for a slice of records. Aborts on the first malformed target.
    pub fn labels(records: &[Record], target: &str) -> Result<Vec<Label>> {
        records.iter().map(|r| r.label(target)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
default,conta_corrente,historico_credito,idade
0,< 0 DM,critical account,35
1,no checking account,existing paid,
0,0 <= ... < 200 DM,all paid,22
";

    fn config() -> DatasetConfig {
        DatasetConfig {
            name: "sample".to_string(),
            path: PathBuf::from("sample.csv"),
            target_field: "default".to_string(),
        }
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(Label::parse("0"), Some(Label::Repaid));
        assert_eq!(Label::parse(" 1 "), Some(Label::Defaulted));
        assert_eq!(Label::parse("2"), None);
        assert_eq!(Label::parse("yes"), None);
        assert_eq!(Label::parse(""), None);
        assert_eq!(Label::from_binary(1), Label::Defaulted);
        assert_eq!(Label::Defaulted.to_binary(), 1);
    }

    #[test]
    fn test_from_reader() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes(), config()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert!(dataset.has_field("idade"));

        let first = &dataset.records[0];
        assert_eq!(first.row(), 1);
        assert_eq!(first.get("conta_corrente"), Some("< 0 DM"));
        assert_eq!(first.label("default").unwrap(), Label::Repaid);
        assert_eq!(first.numeric("idade").unwrap(), Some(35.0));

        let fields: Vec<&str> = first.fields().map(|(k, _)| k).collect();
        assert_eq!(fields, vec!["default", "conta_corrente", "historico_credito", "idade"]);
    }

    #[test]
    fn test_missing_numeric_is_none() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes(), config()).unwrap();
        let second = &dataset.records[1];

        assert!(second.is_missing("idade"));
        assert_eq!(second.numeric("idade").unwrap(), None);
    }

    #[test]
    fn test_invalid_target() {
        let record = Record::from_pairs(7, &[("default", "maybe")]);
        match record.label("default") {
            Err(DatasetError::InvalidTarget { row, value }) => {
                assert_eq!(row, 7);
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_field() {
        let record = Record::from_pairs(1, &[("idade", "30")]);
        assert!(matches!(
            record.label("default"),
            Err(DatasetError::MissingField { row: 1, .. })
        ));
        assert!(record.is_missing("default"));
    }

    #[test]
    fn test_invalid_number() {
        let record = Record::from_pairs(3, &[("idade", "thirty")]);
        assert!(matches!(
            record.numeric("idade"),
            Err(DatasetError::InvalidNumber { row: 3, .. })
        ));
    }

    #[test]
    fn test_labels_abort_on_malformed_target() {
        let csv = "default\n1\n0\nx\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), config()).unwrap();
        let err = Dataset::labels(&dataset.records, "default").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidTarget { row: 3, .. }));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = "a,b\n1,2\n3\n";
        let err = Dataset::from_reader(csv.as_bytes(), config()).unwrap_err();
        assert!(matches!(err, DatasetError::Csv(_)));
    }

    #[test]
    fn test_load_csv_not_found() {
        let mut cfg = config();
        cfg.path = PathBuf::from("definitely/not/here.csv");
        let err = Dataset::load_csv(cfg).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let mut cfg = config();
        cfg.path = file.path().to_path_buf();

        let dataset = Dataset::load_csv(cfg).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.path(), file.path());
    }
}
