pub mod dataset;
pub mod risk_model;
pub mod scaler;

pub use risk_model::{ModelSource, RiskModel, TrainingOptions, TrainingReport};
