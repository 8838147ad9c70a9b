// Sensor readings and acquisition outcomes
pub mod types;

// Heart risk features, scoring and results
pub mod health;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
