use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// JSON files holding a fitted scaler and classifier.
#[derive(Debug, Clone)]
pub struct ModelPersistence {
    model_path: PathBuf,
    scaler_path: PathBuf,
}

impl ModelPersistence {
    pub fn new(model_path: PathBuf, scaler_path: PathBuf) -> Self {
        Self {
            model_path,
            scaler_path,
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    /// Both files must exist for a previous fit to be considered available.
    pub fn exists(&self) -> bool {
        self.model_path.exists() && self.scaler_path.exists()
    }

    /// Load `(scaler, model)`. `Ok(None)` when no previous fit was persisted.
    pub fn load<S, M>(&self) -> Result<Option<(S, M)>>
    where
        S: DeserializeOwned,
        M: DeserializeOwned,
    {
        if !self.exists() {
            return Ok(None);
        }

        let scaler = read_json(&self.scaler_path).context("Failed to load scaler")?;
        let model = read_json(&self.model_path).context("Failed to load model")?;

        info!(
            "Loaded model from {:?} and scaler from {:?}",
            self.model_path, self.scaler_path
        );
        Ok(Some((scaler, model)))
    }

    pub fn save<S, M>(&self, scaler: &S, model: &M) -> Result<()>
    where
        S: Serialize,
        M: Serialize,
    {
        write_json(&self.scaler_path, scaler).context("Failed to save scaler")?;
        write_json(&self.model_path, model).context("Failed to save model")?;

        info!(
            "Saved model to {:?} and scaler to {:?}",
            self.model_path, self.scaler_path
        );
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).context("Failed to create model directory")?;
        }
    }

    let content = serde_json::to_string(value).context("Failed to serialize")?;

    // Atomic write: write to temp file then rename
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).with_context(|| format!("Failed to write {:?}", temp_path))?;
    fs::rename(&temp_path, path).with_context(|| format!("Failed to rename to {:?}", path))?;
    Ok(())
}
