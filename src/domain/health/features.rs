//! Classifier feature layout.
//!
//! The order below is the order the scaler and classifier were fitted on.
//! Any change here is a breaking change for persisted models.

pub const FEATURE_COUNT: usize = 10;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "cp",
    "trtbps",
    "restecg",
    "thalachh",
    "exng",
    "oldpeak",
    "slp",
    "cardio_stress",
];

// Placeholder clinical values used when scoring live readings. They are not
// measured by the device.
pub const PLACEHOLDER_SEX: f64 = 1.0; // male
pub const PLACEHOLDER_CHEST_PAIN: f64 = 0.0;
pub const PLACEHOLDER_RESTING_BP: f64 = 120.0;
pub const PLACEHOLDER_RESTING_ECG: f64 = 1.0;
pub const PLACEHOLDER_EXERCISE_ANGINA: f64 = 0.0;
pub const PLACEHOLDER_ST_DEPRESSION: f64 = 0.5;
pub const PLACEHOLDER_SLOPE: f64 = 1.0;

/// One patient row in clinical terms, before it is flattened for the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClinicalRecord {
    pub age: f64,
    pub sex: f64,
    pub chest_pain_type: f64,
    pub resting_bp: f64,
    pub resting_ecg: f64,
    pub max_heart_rate: f64,
    pub exercise_angina: f64,
    pub st_depression: f64,
    pub slope: f64,
}

impl ClinicalRecord {
    /// Record for a live reading: measured heart rate and age, placeholders
    /// for everything the sensor cannot observe.
    pub fn from_vitals(age: i32, heart_rate: i32) -> Self {
        Self {
            age: f64::from(age),
            sex: PLACEHOLDER_SEX,
            chest_pain_type: PLACEHOLDER_CHEST_PAIN,
            resting_bp: PLACEHOLDER_RESTING_BP,
            resting_ecg: PLACEHOLDER_RESTING_ECG,
            max_heart_rate: f64::from(heart_rate),
            exercise_angina: PLACEHOLDER_EXERCISE_ANGINA,
            st_depression: PLACEHOLDER_ST_DEPRESSION,
            slope: PLACEHOLDER_SLOPE,
        }
    }

    /// Resting blood pressure over heart rate; 1.0 when the heart rate is zero.
    pub fn cardio_stress(&self) -> f64 {
        if self.max_heart_rate > 0.0 {
            self.resting_bp / self.max_heart_rate
        } else {
            1.0
        }
    }
}

/// Fixed-order numeric input consumed by the scaler and classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_record(record: &ClinicalRecord) -> Self {
        Self([
            record.age,
            record.sex,
            record.chest_pain_type,
            record.resting_bp,
            record.resting_ecg,
            record.max_heart_rate,
            record.exercise_angina,
            record.st_depression,
            record.slope,
            record.cardio_stress(),
        ])
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}
