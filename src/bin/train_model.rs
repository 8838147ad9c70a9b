use anyhow::{Context, Result};
use cardiosense::application::ml::dataset::Dataset;
use cardiosense::application::ml::{RiskModel, TrainingOptions};
use cardiosense::domain::health::features::FEATURE_NAMES;
use cardiosense::infrastructure::model_persistence::ModelPersistence;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the heart-risk model offline", long_about = None)]
struct Args {
    /// Path to the heart dataset CSV
    #[arg(long, default_value = "heart-dataset-checkpoint.csv")]
    dataset: PathBuf,

    /// Path to output model file
    #[arg(long, default_value = "heart_model.json")]
    model_out: PathBuf,

    /// Path to output scaler file
    #[arg(long, default_value = "heart_scaler.json")]
    scaler_out: PathBuf,

    /// Inverse regularization strength
    #[arg(long, default_value_t = 0.01)]
    c: f64,

    /// Seed for the train/test split
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.dataset.exists() {
        println!(
            "Dataset not found at {:?}. Nothing to train; the server will fall back to a degraded model.",
            args.dataset
        );
        return Ok(());
    }

    if args.c.is_nan() || args.c <= 0.0 {
        anyhow::bail!("--c must be positive, got {}", args.c);
    }
    if !(0.0..1.0).contains(&args.test_fraction) {
        anyhow::bail!("--test-fraction must be in [0, 1), got {}", args.test_fraction);
    }

    println!("Loading dataset from {:?}", args.dataset);
    let dataset = Dataset::load(&args.dataset)?;

    println!("\nClass Distribution:");
    println!("  Total: {}", dataset.len());
    for (label, count) in dataset.class_counts() {
        println!(
            "  Class {}: {} ({:.1}%)",
            label,
            count,
            count as f64 / dataset.len() as f64 * 100.0
        );
    }
    println!("  Features: {}", FEATURE_NAMES.join(", "));
    println!();

    let options = TrainingOptions {
        regularization_c: args.c,
        test_fraction: args.test_fraction,
        seed: args.seed,
    };

    println!(
        "Training Logistic Regression (C: {}, Seed: {})...",
        options.regularization_c, options.seed
    );
    let (model, report) = RiskModel::train(&dataset, &options)?;

    println!("Trained on {} samples.", report.train_rows);
    match report.holdout_accuracy {
        Some(accuracy) => println!(
            "Holdout (n={}): Accuracy={:.2}%",
            report.test_rows,
            accuracy * 100.0
        ),
        None => println!("No holdout rows; accuracy not evaluated."),
    }

    let persistence = ModelPersistence::new(args.model_out, args.scaler_out);
    println!(
        "Saving model to {:?} and scaler to {:?}",
        persistence.model_path(),
        persistence.scaler_path()
    );
    model
        .persist(&persistence)
        .context("Failed to save model")?;

    println!("Done. Model saved successfully.");
    Ok(())
}
