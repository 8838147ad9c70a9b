use crate::domain::errors::{AcquisitionError, ModelError};
use crate::domain::health::features::FeatureVector;
use crate::domain::types::Reading;
use async_trait::async_trait;

/// A remote biometric device that can be asked for its current reading.
#[async_trait]
pub trait SensorDevice: Send + Sync {
    async fn fetch(&self) -> Result<Reading, AcquisitionError>;

    /// Human-readable location of the device, for logs
    fn address(&self) -> &str;
}

/// Output of a binary classifier for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted label, 0 (no disease) or 1 (disease)
    pub label: u8,
    /// `[p(label=0), p(label=1)]`
    pub probabilities: [f64; 2],
}

impl Prediction {
    /// Probability mass the classifier assigns to its own predicted label.
    pub fn confidence(&self) -> f64 {
        if self.label == 1 {
            self.probabilities[1]
        } else {
            self.probabilities[0]
        }
    }
}

/// Interface for the heart-disease classifier queried per analysis.
pub trait RiskClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;
}
