pub mod acquisition_loop;
pub mod reading_store;
pub mod sensor_source;

pub use acquisition_loop::{AcquisitionHandle, AcquisitionLoop, LoopState};
pub use reading_store::{SharedReadingStore, StoredReading};
pub use sensor_source::{SensorSource, SyntheticRanges};
