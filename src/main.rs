// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Credit dataset analysis and baseline evaluation CLI
//!
//! Usage:
//!   credit-eval --path translated_database.csv --seed 42
//!   credit-eval --baselines CreditRiskRule --output eval/results --format both

use anyhow::Result;
use clap::Parser;
use credit_eval::baselines::all_baselines;
use credit_eval::pipeline::{EvaluationConfig, EvaluationPipeline, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "credit-eval")]
#[command(about = "Explore a credit-default dataset and evaluate baseline predictors")]
#[command(version)]
struct Args {
    /// CSV dataset with a header row
    #[arg(short, long, env = "CREDIT_DATASET_PATH", default_value = "translated_database.csv")]
    path: PathBuf,

    /// Column holding the 0/1 default flag
    #[arg(long, default_value = "default")]
    target: String,

    /// Random seed for the train/test shuffle
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Fraction of records held out for testing
    #[arg(short, long, default_value_t = 0.2)]
    test_size: f64,

    /// Numeric columns to summarise (comma-separated, empty = defaults)
    #[arg(long)]
    numeric: Option<String>,

    /// Specific predictors to run (comma-separated, empty = all)
    #[arg(short, long)]
    baselines: Option<String>,

    /// Output directory for results (nothing is written when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
    format: OutputFormat,

    /// List available predictors
    #[arg(long)]
    list: bool,
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list {
        println!("Available predictors:");
        println!("---------------------");
        for baseline in all_baselines() {
            println!("  {}: {}", baseline.name(), baseline.description());
        }
        return Ok(());
    }

    let mut config = EvaluationConfig {
        dataset_path: args.path,
        target_field: args.target,
        seed: args.seed,
        test_size: args.test_size,
        baseline_names: split_list(args.baselines),
        output_dir: args.output,
        output_format: args.format,
        ..EvaluationConfig::default()
    };
    let numeric = split_list(args.numeric);
    if !numeric.is_empty() {
        config.numeric_columns = numeric;
    }

    tracing::info!("Dataset: {}", config.dataset_path.display());
    tracing::info!("Seed: {}, test size: {}", config.seed, config.test_size);

    let mut pipeline = EvaluationPipeline::new(config);
    let results = pipeline.run()?;

    println!("\n{}", results.dataset_summary.format());

    for result in &results.model_results {
        println!("Evaluation of {} (test set, n={}):", result.model_name, result.eval_samples);
        println!("{}", result.metrics.format());
    }

    println!("{:-<70}", "");
    println!(
        "{:<16} {:>10} {:>10} {:>10} {:>10}",
        "Model", "Accuracy", "Precision", "Recall", "F1"
    );
    println!("{:-<70}", "");
    for result in &results.model_results {
        println!(
            "{:<16} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            result.model_name,
            result.metrics.accuracy,
            result.metrics.precision,
            result.metrics.recall,
            result.metrics.f1
        );
    }
    println!("{:-<70}", "");
    println!("Best Model: {} (F1={:.4})", results.summary.best_model, results.summary.best_f1);

    for path in EvaluationPipeline::write_outputs(&results)? {
        println!("Saved: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parses_known_values() {
        let args = Args::try_parse_from(["credit-eval", "--format", "markdown"]).unwrap();
        assert_eq!(args.format, OutputFormat::Markdown);

        let args = Args::try_parse_from(["credit-eval"]).unwrap();
        assert_eq!(args.format, OutputFormat::Both);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["credit-eval", "--format", "md"]).is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("a, b,,c".to_string())), vec!["a", "b", "c"]);
        assert!(split_list(None).is_empty());
    }
}
