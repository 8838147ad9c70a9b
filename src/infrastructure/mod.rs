pub mod http_client_factory;
pub mod model_persistence;
pub mod sensor_device;

pub use model_persistence::ModelPersistence;
pub use sensor_device::HttpSensorDevice;
