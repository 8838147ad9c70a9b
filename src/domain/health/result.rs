use crate::domain::health::risk::RiskCategory;
use crate::domain::types::Reading;
use serde::{Deserialize, Serialize};

/// Message returned when the top-level `/analyze` handler itself fails.
pub const REQUEST_FAILURE_MESSAGE: &str = "⚠️ Unable to analyze heart data. Please try again.";

/// Outcome of one heart-health analysis, returned as the API payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub category: RiskCategory,
    pub message: String,
    pub risk_score: u32,
    pub confidence: f64,
    pub prediction: u8,
    pub heart_rate: i32,
    pub max_hr: i32,
    pub temperature: f64,
}

impl RiskResult {
    /// `Analysis Error` result that still carries the reading's vitals.
    pub fn degraded(reading: &Reading, message: &str) -> Self {
        Self {
            category: RiskCategory::AnalysisError,
            message: message.to_string(),
            risk_score: 0,
            confidence: 0.0,
            prediction: 0,
            heart_rate: reading.heart_rate,
            max_hr: 0,
            temperature: reading.temperature,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == RiskCategory::AnalysisError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_result_keeps_vitals() {
        let reading = Reading {
            temperature: 36.8,
            humidity: 20.0,
            heart_rate: 91,
            ecg: 300,
        };
        let result = RiskResult::degraded(&reading, REQUEST_FAILURE_MESSAGE);

        assert!(result.is_error());
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.prediction, 0);
        assert_eq!(result.heart_rate, 91);
        assert!((result.temperature - 36.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_result_json_shape() {
        let result = RiskResult::degraded(&Reading::default(), REQUEST_FAILURE_MESSAGE);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["category"], "Analysis Error");
        for key in [
            "message",
            "risk_score",
            "confidence",
            "prediction",
            "heart_rate",
            "max_hr",
            "temperature",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
