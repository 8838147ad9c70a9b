//! Risk model configuration parsing from environment variables.
//!
//! This module handles the persisted-fit locations, the training dataset
//! and the training hyperparameters.

use super::parse_or;
use crate::application::ml::TrainingOptions;
use anyhow::{Result, bail};
use std::path::PathBuf;

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub dataset_path: PathBuf,
    pub regularization_c: f64,
    pub seed: u64,
}

impl ModelEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str, default: &str| {
            PathBuf::from(lookup(key).unwrap_or_else(|| default.to_string()))
        };

        let regularization_c: f64 = parse_or(lookup, "MODEL_REGULARIZATION_C", 0.01)?;
        if !regularization_c.is_finite() || regularization_c <= 0.0 {
            bail!(
                "Invalid MODEL_REGULARIZATION_C: {}. Must be > 0",
                regularization_c
            );
        }

        Ok(Self {
            model_path: path("MODEL_PATH", "heart_model.json"),
            scaler_path: path("SCALER_PATH", "heart_scaler.json"),
            dataset_path: path("DATASET_PATH", "heart-dataset-checkpoint.csv"),
            regularization_c,
            seed: parse_or(lookup, "MODEL_SEED", 42)?,
        })
    }

    pub fn training_options(&self) -> TrainingOptions {
        TrainingOptions {
            regularization_c: self.regularization_c,
            seed: self.seed,
            ..TrainingOptions::default()
        }
    }
}
