use serde::{Deserialize, Serialize};
use std::fmt;

/// One complete set of sensor measurements.
///
/// Every field is required when deserializing, so a device payload that
/// omits one of them is rejected as a whole rather than half-applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    /// Body temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Heart rate in BPM
    pub heart_rate: i32,
    /// Raw ECG sample (device units)
    pub ecg: i32,
}

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingSource {
    Live,
    Synthetic,
}

impl fmt::Display for ReadingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingSource::Live => write!(f, "live"),
            ReadingSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Result of one acquisition attempt.
///
/// Synthesis is an explicit branch: the device failure is kept as `reason`
/// for tracing but never surfaced to callers as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionOutcome {
    Live(Reading),
    Synthetic { reading: Reading, reason: String },
}

impl AcquisitionOutcome {
    pub fn reading(&self) -> Reading {
        match self {
            AcquisitionOutcome::Live(reading) => *reading,
            AcquisitionOutcome::Synthetic { reading, .. } => *reading,
        }
    }

    pub fn source(&self) -> ReadingSource {
        match self {
            AcquisitionOutcome::Live(_) => ReadingSource::Live,
            AcquisitionOutcome::Synthetic { .. } => ReadingSource::Synthetic,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, AcquisitionOutcome::Live(_))
    }
}
