// Sensor polling, synthetic fallback and the shared reading store
pub mod acquisition;

// Rule-based scoring on top of the classifier
pub mod analysis;

// Feature scaling, dataset loading and the logistic-regression model
pub mod ml;

// Startup and shutdown orchestration
pub mod system;
