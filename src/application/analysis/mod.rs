pub mod risk_analyzer;

pub use risk_analyzer::{AnalysisRequest, DEFAULT_AGE, RiskAnalyzer};
