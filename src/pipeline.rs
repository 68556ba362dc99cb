// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Reproducible evaluation pipeline for credit-default predictors
//!
//! Orchestrates:
//! - Dataset loading
//! - Descriptive statistics
//! - Seeded train/test split
//! - Predictor evaluation on the test split
//! - Results serialization and markdown reporting

use crate::baselines::{all_baselines, Predictor};
use crate::datasets::{Dataset, DatasetConfig, Record};
use crate::metrics::Metrics;
use crate::split::{train_test_split, DEFAULT_SEED, DEFAULT_TEST_SIZE};
use crate::summary::DatasetSummary;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Misclassified rows kept per predictor for inspection
const MAX_ERROR_SAMPLES: usize = 10;

/// Configuration for the evaluation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// CSV file to load
    pub dataset_path: PathBuf,
    /// Column holding the 0/1 default flag
    pub target_field: String,
    /// Random seed for the train/test shuffle
    pub seed: u64,
    /// Fraction of records held out for testing
    pub test_size: f64,
    /// Columns summarised as numbers
    pub numeric_columns: Vec<String>,
    /// Specific predictors to run (empty = all)
    pub baseline_names: Vec<String>,
    /// Output directory for results (nothing is written when unset)
    pub output_dir: Option<PathBuf>,
    /// Which files `write_outputs` produces
    pub output_format: OutputFormat,
}

/// Result files written to `output_dir`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    Both,
}

impl OutputFormat {
    fn json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    fn markdown(self) -> bool {
        matches!(self, OutputFormat::Markdown | OutputFormat::Both)
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        let dataset = DatasetConfig::default();
        Self {
            dataset_path: dataset.path,
            target_field: dataset.target_field,
            seed: DEFAULT_SEED,
            test_size: DEFAULT_TEST_SIZE,
            numeric_columns: [
                "prazo_emprestimo_meses",
                "valor_emprestimo",
                "idade",
                "taxa_comp_salario",
                "n_creditos_banco",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            baseline_names: vec![],
            output_dir: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn dataset_config(&self) -> DatasetConfig {
        DatasetConfig {
            path: self.dataset_path.clone(),
            target_field: self.target_field.clone(),
            ..DatasetConfig::default()
        }
    }
}

/// Results from a single predictor evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResult {
    pub model_name: String,
    pub model_description: String,
    pub metrics: Metrics,
    pub specificity: f64,
    pub eval_samples: usize,
    /// Source row numbers of the first misclassified records
    pub misclassified_rows: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    pub path: PathBuf,
    pub total_samples: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    pub seed: u64,
    pub test_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub best_model: String,
    pub best_f1: f64,
    pub best_accuracy: f64,
}

/// Complete evaluation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResults {
    pub config: EvaluationConfig,
    pub dataset_info: DatasetInfo,
    pub dataset_summary: DatasetSummary,
    pub model_results: Vec<ModelResult>,
    pub summary: EvaluationSummary,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Main evaluation pipeline
pub struct EvaluationPipeline {
    config: EvaluationConfig,
    dataset: Option<Dataset>,
}

impl EvaluationPipeline {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            dataset: None,
        }
    }

    /// Use an already loaded dataset instead of reading `dataset_path`
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Load dataset based on configuration
    pub fn load_dataset(&mut self) -> Result<&Dataset> {
        let dataset = Dataset::load_csv(self.config.dataset_config())?;
        self.ensure_target(&dataset)?;
        Ok(&*self.dataset.insert(dataset))
    }

    /// The configured target column must exist, whatever config the dataset was loaded with
    fn ensure_target(&self, dataset: &Dataset) -> Result<()> {
        if !dataset.has_field(&self.config.target_field) {
            bail!(
                "Target column '{}' not present in {}",
                self.config.target_field,
                dataset.path().display()
            );
        }
        Ok(())
    }

    /// Evaluate one predictor against the labelled records
    pub fn evaluate_predictor(&self, predictor: &dyn Predictor, records: &[Record]) -> Result<ModelResult> {
        let y_true = Dataset::labels(records, &self.config.target_field)
            .with_context(|| format!("Failed to read ground truth for {}", predictor.name()))?;
        let y_pred = predictor.predict_batch(records);

        let metrics = Metrics::from_labels(&y_true, &y_pred);

        let misclassified_rows = records
            .iter()
            .zip(y_true.iter().zip(y_pred.iter()))
            .filter(|(_, (truth, pred))| truth != pred)
            .map(|(record, _)| record.row())
            .take(MAX_ERROR_SAMPLES)
            .collect();

        Ok(ModelResult {
            model_name: predictor.name().to_string(),
            model_description: predictor.description().to_string(),
            specificity: metrics.confusion_matrix().specificity(),
            metrics,
            eval_samples: records.len(),
            misclassified_rows,
        })
    }

    /// Run the full pipeline with the built-in predictors
    pub fn run(&mut self) -> Result<EvaluationResults> {
        let wanted = &self.config.baseline_names;
        let predictors: Vec<Box<dyn Predictor>> = all_baselines()
            .into_iter()
            .filter(|p| wanted.is_empty() || wanted.iter().any(|w| w.eq_ignore_ascii_case(p.name())))
            .collect();

        if predictors.is_empty() {
            bail!("No predictor matches {:?}", wanted);
        }

        self.run_with(&predictors)
    }

    /// Run the full pipeline with caller-supplied predictors
    pub fn run_with(&mut self, predictors: &[Box<dyn Predictor>]) -> Result<EvaluationResults> {
        if self.dataset.is_none() {
            self.load_dataset()?;
        }
        let dataset = self.dataset.as_ref().context("Dataset not loaded")?;
        self.ensure_target(dataset)?;

        let dataset_summary =
            DatasetSummary::compute(dataset, &self.config.target_field, &self.config.numeric_columns)
                .context("Failed to summarise dataset")?;

        let split = train_test_split(&dataset.records, self.config.seed, self.config.test_size)?;

        tracing::info!(
            "Split {} records: train={}, test={} (seed={})",
            dataset.len(),
            split.train.len(),
            split.test.len(),
            self.config.seed
        );

        let dataset_info = DatasetInfo {
            name: dataset.config.name.clone(),
            path: dataset.config.path.clone(),
            total_samples: dataset.len(),
            train_samples: split.train.len(),
            test_samples: split.test.len(),
            seed: self.config.seed,
            test_size: self.config.test_size,
        };

        let mut model_results = Vec::with_capacity(predictors.len());
        for predictor in predictors {
            tracing::info!("Evaluating predictor: {}", predictor.name());

            let result = self.evaluate_predictor(predictor.as_ref(), &split.test)?;

            tracing::info!(
                "  {} - Accuracy: {:.4}, Precision: {:.4}, Recall: {:.4}, F1: {:.4}",
                result.model_name,
                result.metrics.accuracy,
                result.metrics.precision,
                result.metrics.recall,
                result.metrics.f1
            );

            model_results.push(result);
        }

        let mut summary = EvaluationSummary {
            best_model: "None".to_string(),
            best_f1: 0.0,
            best_accuracy: 0.0,
        };
        for result in &model_results {
            if result.metrics.f1 > summary.best_f1 {
                summary.best_f1 = result.metrics.f1;
                summary.best_accuracy = result.metrics.accuracy;
                summary.best_model = result.model_name.clone();
            }
        }

        Ok(EvaluationResults {
            config: self.config.clone(),
            dataset_info,
            dataset_summary,
            model_results,
            summary,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Write the JSON and/or markdown files selected by the config into `output_dir`.
    /// Returns the written paths; nothing is written when no directory is configured.
    pub fn write_outputs(results: &EvaluationResults) -> Result<Vec<PathBuf>> {
        let Some(output_dir) = results.config.output_dir.as_deref() else {
            return Ok(Vec::new());
        };
        let format = results.config.output_format;

        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let stem = format!("credit_eval_{}", results.timestamp.format("%Y%m%d_%H%M%S"));
        let mut written = Vec::new();

        if format.json() {
            let json_path = output_dir.join(format!("{}.json", stem));
            Self::save_results(results, &json_path)?;
            written.push(json_path);
        }

        if format.markdown() {
            let md_path = output_dir.join(format!("{}.md", stem));
            std::fs::write(&md_path, Self::generate_report(results))
                .with_context(|| format!("Failed to write {}", md_path.display()))?;
            tracing::info!("Report saved to {}", md_path.display());
            written.push(md_path);
        }

        Ok(written)
    }

    /// Save results to JSON file
    pub fn save_results(results: &EvaluationResults, output_path: &Path) -> Result<()> {
        std::fs::create_dir_all(output_path.parent().unwrap_or(Path::new(".")))?;
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        tracing::info!("Results saved to {}", output_path.display());
        Ok(())
    }

    /// Generate a markdown report
    pub fn generate_report(results: &EvaluationResults) -> String {
        let mut report = String::new();

        report.push_str("# Credit Default Evaluation Report\n\n");
        report.push_str(&format!("**Generated:** {}\n\n", results.timestamp.format("%Y-%m-%d %H:%M:%S UTC")));
        report.push_str(&format!("**Version:** {}\n\n", results.version));

        let info = &results.dataset_info;
        report.push_str("## Dataset\n\n");
        report.push_str(&format!("- **Name:** {}\n", info.name));
        report.push_str(&format!("- **Path:** {}\n", info.path.display()));
        report.push_str(&format!("- **Total Samples:** {}\n", info.total_samples));
        report.push_str(&format!(
            "- **Split Sizes:** Train={}, Test={} (seed={}, test_size={})\n\n",
            info.train_samples, info.test_samples, info.seed, info.test_size
        ));

        report.push_str("### Exploratory Summary\n\n");
        report.push_str(&format!("```\n{}```\n\n", results.dataset_summary.format()));

        report.push_str("## Summary\n\n");
        report.push_str(&format!(
            "**Best Model:** {} (F1={:.4}, Accuracy={:.4})\n\n",
            results.summary.best_model, results.summary.best_f1, results.summary.best_accuracy
        ));

        report.push_str("### Predictor Comparison\n\n");
        report.push_str("| Model | Accuracy | Precision | Recall | F1 Score | Specificity |\n");
        report.push_str("|-------|----------|-----------|--------|----------|-------------|\n");

        for result in &results.model_results {
            report.push_str(&format!(
                "| {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} |\n",
                result.model_name,
                result.metrics.accuracy,
                result.metrics.precision,
                result.metrics.recall,
                result.metrics.f1,
                result.specificity
            ));
        }

        report.push_str("\n## Detailed Results\n\n");

        for result in &results.model_results {
            report.push_str(&format!("### {}\n\n", result.model_name));
            report.push_str(&format!("*{}*\n\n", result.model_description));
            report.push_str(&format!("- Evaluation samples: {}\n", result.eval_samples));
            if !result.misclassified_rows.is_empty() {
                let rows: Vec<String> = result.misclassified_rows.iter().map(|r| r.to_string()).collect();
                report.push_str(&format!("- First misclassified rows: {}\n", rows.join(", ")));
            }
            report.push_str(&format!("\n```\n{}```\n\n", result.metrics.format()));
        }

        report.push_str("## Configuration\n\n");
        report.push_str(&format!(
            "```json\n{}\n```\n",
            serde_json::to_string_pretty(&results.config).unwrap_or_default()
        ));

        report
    }
}
