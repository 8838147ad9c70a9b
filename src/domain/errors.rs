use thiserror::Error;

/// Errors raised by a single attempt to read the sensor device
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Device timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Device unreachable: {reason}")]
    Connection { reason: String },

    #[error("Device answered with HTTP {status}")]
    BadStatus { status: u16 },

    #[error("Malformed device payload: {reason}")]
    MalformedPayload { reason: String },
}

/// Errors related to the risk classifier lifecycle and inference
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training dataset unavailable at {path}: {reason}")]
    DatasetUnavailable { path: String, reason: String },

    #[error("Training dataset contains no usable rows")]
    EmptyDataset,

    #[error("Training labels contain a single class ({label})")]
    SingleClass { label: i32 },

    #[error("Model training failed: {reason}")]
    Training { reason: String },

    #[error("Feature count mismatch: expected {expected}, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Prediction failed: {reason}")]
    Prediction { reason: String },
}

/// Errors raised while scoring a reading. Never returned to API callers:
/// the analyzer turns them into an `Analysis Error` result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid age {age}: must be between 0 and 219")]
    InvalidAge { age: i32 },

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquisition_error_formatting() {
        let error = AcquisitionError::Timeout { timeout_ms: 1000 };
        assert!(error.to_string().contains("1000ms"));

        let error = AcquisitionError::BadStatus { status: 503 };
        assert!(error.to_string().contains("503"));
    }

    #[test]
    fn test_model_error_wraps_into_analysis_error() {
        let error: AnalysisError = ModelError::FeatureMismatch {
            expected: 10,
            actual: 9,
        }
        .into();

        let msg = error.to_string();
        assert!(msg.contains("expected 10"));
        assert!(msg.contains("got 9"));
    }
}
