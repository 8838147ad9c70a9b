//! Rule-based heart risk scoring.
//!
//! Points are summed from three independent contributions (heart rate band,
//! temperature band, classifier verdict) and the total maps onto a category.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const FEVER_THRESHOLD_C: f64 = 37.5;
pub const HYPOTHERMIA_THRESHOLD_C: f64 = 35.0;

/// Highest score the three contributions can add up to (3 + 2 + 2).
pub const MAX_RISK_SCORE: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Healthy Heart")]
    HealthyHeart,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Analysis Error")]
    AnalysisError,
}

impl RiskCategory {
    /// Descending thresholds: >=5 high, >=3 moderate, >=1 low, else healthy.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 5 => RiskCategory::HighRisk,
            s if s >= 3 => RiskCategory::ModerateRisk,
            s if s >= 1 => RiskCategory::LowRisk,
            _ => RiskCategory::HealthyHeart,
        }
    }

    /// Canned user-facing messages; one is picked at random per analysis.
    pub fn messages(&self) -> &'static [&'static str] {
        match self {
            RiskCategory::HighRisk => &[
                "🚨 Seek immediate medical attention! Signs of heart strain detected!",
                "⚠️ Warning: Your heart is under extreme stress. Stop running immediately!",
                "🚨 High risk of heart attack! Consult a cardiologist before running again!",
            ],
            RiskCategory::ModerateRisk => &[
                "⚠️ Be cautious! Your heart is working harder than normal.",
                "🔴 Slow down! Your heart rate is beyond safe running limits.",
                "⚠️ Moderate risk detected. Consider consulting a doctor for a checkup.",
            ],
            RiskCategory::LowRisk => &[
                "✅ You're doing fine, but stay aware of your limits.",
                "📉 Maintain a steady pace to keep your heart in optimal condition.",
                "✅ Slight risk detected. Keep training smartly and monitor your stats.",
            ],
            RiskCategory::HealthyHeart => &[
                "💪 Excellent heart condition! Keep pushing forward!",
                "🔥 You're in great shape! Maintain this pace for peak performance.",
                "💙 No heart concerns detected. Keep running strong and stay hydrated!",
            ],
            RiskCategory::AnalysisError => {
                &["⚠️ Unable to analyze heart data. Please check sensor connections."]
            }
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskCategory::HealthyHeart => "Healthy Heart",
            RiskCategory::LowRisk => "Low Risk",
            RiskCategory::ModerateRisk => "Moderate Risk",
            RiskCategory::HighRisk => "High Risk",
            RiskCategory::AnalysisError => "Analysis Error",
        };
        write!(f, "{}", label)
    }
}

/// Age-predicted maximum heart rate (220 - age).
pub fn max_heart_rate(age: i32) -> i32 {
    220 - age
}

/// Heart rate band as a share of max HR: >90% +3, >80% +2, >70% +1.
pub fn heart_rate_points(heart_rate: i32, max_hr: i32) -> u32 {
    let hr = f64::from(heart_rate);
    let max = f64::from(max_hr);
    if hr > max * 0.9 {
        3
    } else if hr > max * 0.8 {
        2
    } else if hr > max * 0.7 {
        1
    } else {
        0
    }
}

/// Fever +2, hypothermia +1.
pub fn temperature_points(temperature: f64) -> u32 {
    if temperature > FEVER_THRESHOLD_C {
        2
    } else if temperature < HYPOTHERMIA_THRESHOLD_C {
        1
    } else {
        0
    }
}

pub fn model_points(label: u8) -> u32 {
    if label == 1 { 2 } else { 0 }
}

/// Per-contribution breakdown of a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskScore {
    pub heart_rate: u32,
    pub temperature: u32,
    pub model: u32,
}

impl RiskScore {
    pub fn compute(heart_rate: i32, max_hr: i32, temperature: f64, label: u8) -> Self {
        Self {
            heart_rate: heart_rate_points(heart_rate, max_hr),
            temperature: temperature_points(temperature),
            model: model_points(label),
        }
    }

    pub fn total(&self) -> u32 {
        self.heart_rate + self.temperature + self.model
    }

    pub fn category(&self) -> RiskCategory {
        RiskCategory::from_score(self.total())
    }
}
