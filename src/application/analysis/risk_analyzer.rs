use crate::domain::errors::AnalysisError;
use crate::domain::health::features::{ClinicalRecord, FeatureVector};
use crate::domain::health::result::RiskResult;
use crate::domain::health::risk::{RiskCategory, RiskScore, max_heart_rate};
use crate::domain::ports::RiskClassifier;
use crate::domain::types::Reading;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tracing::{debug, error};

pub const DEFAULT_AGE: i32 = 30;

/// Ephemeral input to one analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisRequest {
    pub reading: Reading,
    pub age: Option<i32>,
}

impl AnalysisRequest {
    pub fn new(reading: Reading, age: Option<i32>) -> Self {
        Self { reading, age }
    }
}

/// Combines the classifier verdict with rule-based vitals scoring.
pub struct RiskAnalyzer {
    classifier: Arc<dyn RiskClassifier>,
}

impl RiskAnalyzer {
    pub fn new(classifier: Arc<dyn RiskClassifier>) -> Self {
        Self { classifier }
    }

    /// Never fails: internal errors produce an `Analysis Error` result that
    /// still carries the reading's heart rate and temperature.
    pub fn analyze(&self, request: &AnalysisRequest) -> RiskResult {
        match self.try_analyze(request) {
            Ok(result) => result,
            Err(e) => {
                error!("Error in heart health analysis: {}", e);
                let message = RiskCategory::AnalysisError.messages()[0];
                RiskResult::degraded(&request.reading, message)
            }
        }
    }

    fn try_analyze(&self, request: &AnalysisRequest) -> Result<RiskResult, AnalysisError> {
        let age = request.age.unwrap_or(DEFAULT_AGE);
        if !(0..220).contains(&age) {
            return Err(AnalysisError::InvalidAge { age });
        }

        // humidity and ecg are not used for scoring
        let heart_rate = request.reading.heart_rate;
        let temperature = request.reading.temperature;
        let max_hr = max_heart_rate(age);

        let features = FeatureVector::from_record(&ClinicalRecord::from_vitals(age, heart_rate));
        let prediction = self.classifier.predict(&features)?;

        let score = RiskScore::compute(heart_rate, max_hr, temperature, prediction.label);
        let category = score.category();
        let message = category
            .messages()
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_default();

        debug!(
            "Analysis: hr={} max_hr={} temp={} label={} score={:?} -> {}",
            heart_rate, max_hr, temperature, prediction.label, score, category
        );

        Ok(RiskResult {
            category,
            message: message.to_string(),
            risk_score: score.total(),
            confidence: prediction.confidence(),
            prediction: prediction.label,
            heart_rate,
            max_hr,
            temperature,
        })
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }
}
