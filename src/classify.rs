// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath

//! Command-line scorer
//!
//! Scores a text argument, a text file, or sample rows from a news CSV
//! (title and text columns) against the same artifacts the API serves.
//!
//! Usage:
//!   classify "Full article text here..."
//!   classify --file article.txt --models ./models
//!   classify --csv True.csv --num-samples 3

use anyhow::{Context, Result};
use clap::Parser;
use fakenews_detector::config::init_tracing;
use fakenews_detector::scoring::{Detection, Detector};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "classify")]
#[command(about = "Classify news text as Fake or Real")]
#[command(version)]
struct Args {
    /// Text to classify
    text: Option<String>,

    /// Read the text to classify from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Score sample rows from a news CSV (title and text columns)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of CSV rows to score
    #[arg(short, long, default_value_t = 3)]
    num_samples: usize,

    /// Directory holding vectorizer.json, dt_model.json, rf_model.json
    #[arg(short, long, default_value = "models")]
    models: PathBuf,
}

fn print_detection(detection: &Detection) {
    println!(
        "Prediction: {} ({:.1}% confidence)",
        detection.prediction, detection.confidence
    );
    println!(
        "  Decision Tree: {} ({:.1}%)",
        detection.comparison.decision_tree.prediction,
        detection.comparison.decision_tree.confidence
    );
    println!(
        "  Random Forest: {} ({:.1}%)",
        detection.comparison.random_forest.prediction,
        detection.comparison.random_forest.confidence
    );
    println!("  Best: {}", detection.best_algorithm);
}

fn score_csv(detector: &Detector, path: &Path, limit: usize) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open CSV file: {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    for (idx, result) in reader.records().take(limit).enumerate() {
        let record =
            result.with_context(|| format!("failed to read record {} in {}", idx, path.display()))?;

        let title = record.get(0).unwrap_or("");
        let text = record.get(1).unwrap_or("");
        let content = format!("{} {}", title, text);

        let preview: String = title.chars().take(100).collect();
        println!("\nSample {}: {}...", idx, preview);

        match detector.score(&content) {
            Ok(detection) => print_detection(&detection),
            Err(e) => println!("  Skipped: {e}"),
        }
        println!("---");
    }

    Ok(())
}

fn main() -> Result<()> {
    init_tracing("warn");

    let args = Args::parse();
    let detector = Detector::load(&args.models)?;

    if let Some(path) = args.csv.as_ref() {
        return score_csv(&detector, path, args.num_samples);
    }

    let text = if let Some(path) = args.file.as_ref() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    } else if let Some(text) = args.text {
        text
    } else {
        anyhow::bail!("provide a text argument, --file, or --csv");
    };

    let detection = detector.score(&text)?;
    print_detection(&detection);

    Ok(())
}
