use super::dataset::Dataset;
use super::scaler::StandardScaler;
use crate::domain::errors::ModelError;
use crate::domain::health::features::{FEATURE_COUNT, FeatureVector};
use crate::domain::ports::{Prediction, RiskClassifier};
use crate::infrastructure::model_persistence::ModelPersistence;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use std::path::Path;
use tracing::{error, info, warn};

pub type Classifier = LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Rows generated for the degraded fallback fit.
const FALLBACK_ROWS: usize = 100;

/// How the in-memory model was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    Loaded,
    Trained,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct TrainingOptions {
    /// Inverse L2 regularization strength
    pub regularization_c: f64,
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            regularization_c: 0.01,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub holdout_accuracy: Option<f64>,
}

/// Fitted scaler + logistic classifier over the 10-feature layout.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct RiskModel {
    scaler: StandardScaler,
    classifier: Classifier,
    weights: Vec<f64>,
    intercept: f64,
    source: ModelSource,
}

impl std::fmt::Debug for RiskModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskModel")
            .field("source", &self.source)
            .field("weights", &self.weights)
            .field("intercept", &self.intercept)
            .finish()
    }
}

impl RiskModel {
    /// Load a persisted fit, else train from the dataset (and persist), else
    /// fall back to a fit on random data.
    pub fn load_or_train(
        persistence: &ModelPersistence,
        dataset_path: &Path,
        options: &TrainingOptions,
    ) -> Result<Self, ModelError> {
        match persistence.load::<StandardScaler, Classifier>() {
            Ok(Some((scaler, classifier))) => {
                match Self::from_parts(scaler, classifier, ModelSource::Loaded) {
                    Ok(model) => return Ok(model),
                    Err(e) => warn!("Persisted model rejected: {}. Retraining...", e),
                }
            }
            Ok(None) => info!("No persisted model found. Training a new one..."),
            Err(e) => warn!("Error loading model: {:#}. Retraining...", e),
        }

        let trained = Dataset::load(dataset_path).and_then(|dataset| Self::train(&dataset, options));
        match trained {
            Ok((model, report)) => {
                info!(
                    "Model trained on {} rows (holdout {} rows, accuracy {})",
                    report.train_rows,
                    report.test_rows,
                    report
                        .holdout_accuracy
                        .map(|a| format!("{:.3}", a))
                        .unwrap_or_else(|| "n/a".to_string())
                );
                if let Err(e) = model.persist(persistence) {
                    warn!("Failed to persist trained model: {:#}", e);
                }
                Ok(model)
            }
            Err(e) => {
                error!("Error training model: {}. Creating fallback model...", e);
                Self::fallback(options.seed)
            }
        }
    }

    /// Stratified split, standardize, fit an L2-regularized logistic regression.
    pub fn train(
        dataset: &Dataset,
        options: &TrainingOptions,
    ) -> Result<(Self, TrainingReport), ModelError> {
        let counts = dataset.class_counts();
        if counts.len() < 2 {
            let label = counts.keys().next().copied().ok_or(ModelError::EmptyDataset)?;
            return Err(ModelError::SingleClass { label });
        }

        let (train, test) = dataset.stratified_split(options.test_fraction, options.seed);
        let scaler = StandardScaler::fit(&train.features)?;
        let x_train = scaler.transform_rows(&train.features)?;

        let alpha = 1.0 / options.regularization_c;
        let classifier = fit_classifier(&x_train, &train.labels, alpha)?;
        let model = Self::from_parts(scaler, classifier, ModelSource::Trained)?;

        let holdout_accuracy = if test.is_empty() {
            None
        } else {
            Some(model.accuracy(&test)?)
        };

        let report = TrainingReport {
            train_rows: train.len(),
            test_rows: test.len(),
            holdout_accuracy,
        };
        Ok((model, report))
    }

    /// Degraded model fitted on random features and labels, so the service
    /// stays up without a dataset.
    pub fn fallback(seed: u64) -> Result<Self, ModelError> {
        warn!("Creating fallback model from random data; predictions are not meaningful");
        let mut rng = StdRng::seed_from_u64(seed);

        let rows: Vec<Vec<f64>> = (0..FALLBACK_ROWS)
            .map(|_| (0..FEATURE_COUNT).map(|_| rng.random_range(-2.0..2.0)).collect())
            .collect();
        let mut labels: Vec<i32> = (0..FALLBACK_ROWS).map(|_| rng.random_range(0..=1)).collect();
        // the solver needs both classes
        labels[0] = 0;
        labels[1] = 1;

        let scaler = StandardScaler::fit(&rows)?;
        let classifier = fit_classifier(&scaler.transform_rows(&rows)?, &labels, 1.0)?;
        Self::from_parts(scaler, classifier, ModelSource::Fallback)
    }

    /// Validate that scaler and classifier both match the feature layout.
    pub fn from_parts(
        scaler: StandardScaler,
        classifier: Classifier,
        source: ModelSource,
    ) -> Result<Self, ModelError> {
        if scaler.n_features() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_COUNT,
                actual: scaler.n_features(),
            });
        }

        let coefficients = classifier.coefficients();
        let (rows, cols) = coefficients.shape();
        let weights: Vec<f64> = if rows == 1 {
            (0..cols).map(|j| *coefficients.get((0, j))).collect()
        } else if cols == 1 {
            (0..rows).map(|i| *coefficients.get((i, 0))).collect()
        } else {
            return Err(ModelError::Training {
                reason: format!("Expected a binary classifier, got {}x{} coefficients", rows, cols),
            });
        };
        if weights.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_COUNT,
                actual: weights.len(),
            });
        }
        let intercept = *classifier.intercept().get((0, 0));

        Ok(Self {
            scaler,
            classifier,
            weights,
            intercept,
            source,
        })
    }

    pub fn persist(&self, persistence: &ModelPersistence) -> anyhow::Result<()> {
        persistence.save(&self.scaler, &self.classifier)
    }

    pub fn source(&self) -> ModelSource {
        self.source
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Share of rows whose predicted label matches.
    pub fn accuracy(&self, dataset: &Dataset) -> Result<f64, ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        let scaled = self.scaler.transform_rows(&dataset.features)?;
        let predicted = predict_labels(&self.classifier, &scaled)?;
        let correct = predicted
            .iter()
            .zip(&dataset.labels)
            .filter(|(p, y)| p == y)
            .count();
        Ok(correct as f64 / dataset.len() as f64)
    }

    fn positive_probability(&self, scaled: &[f64]) -> f64 {
        let z: f64 = scaled
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}

impl RiskClassifier for RiskModel {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        let scaled = self.scaler.transform(features.as_slice())?;
        let label = predict_labels(&self.classifier, std::slice::from_ref(&scaled))?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Prediction {
                reason: "No prediction returned".to_string(),
            })?;

        let p1 = self.positive_probability(&scaled);
        Ok(Prediction {
            label: if label == 1 { 1 } else { 0 },
            probabilities: [1.0 - p1, p1],
        })
    }

    fn name(&self) -> &str {
        "SmartCore Logistic Regression"
    }
}

fn fit_classifier(rows: &[Vec<f64>], labels: &[i32], alpha: f64) -> Result<Classifier, ModelError> {
    let x = DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| ModelError::Training {
        reason: format!("Matrix creation failed: {}", e),
    })?;
    let params = LogisticRegressionParameters::default().with_alpha(alpha);
    LogisticRegression::fit(&x, &labels.to_vec(), params).map_err(|e| ModelError::Training {
        reason: e.to_string(),
    })
}

fn predict_labels(classifier: &Classifier, rows: &[Vec<f64>]) -> Result<Vec<i32>, ModelError> {
    let x = DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| ModelError::Prediction {
        reason: format!("Matrix creation failed: {}", e),
    })?;
    classifier.predict(&x).map_err(|e| ModelError::Prediction {
        reason: e.to_string(),
    })
}
