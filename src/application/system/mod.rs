use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::acquisition::{
    AcquisitionHandle, AcquisitionLoop, SensorSource, SharedReadingStore,
};
use crate::application::analysis::RiskAnalyzer;
use crate::application::ml::{ModelSource, RiskModel};
use crate::config::Config;
use crate::domain::ports::SensorDevice;
use crate::infrastructure::model_persistence::ModelPersistence;
use crate::infrastructure::sensor_device::HttpSensorDevice;

/// Upper bound on how long shutdown waits for the acquisition loop.
const ACQUISITION_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything request handlers need, shared across tasks.
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<SharedReadingStore>,
    pub analyzer: Arc<RiskAnalyzer>,
    pub model_source: ModelSource,
}

pub struct Application {
    pub config: Config,
    pub device: Arc<dyn SensorDevice>,
    pub store: Arc<SharedReadingStore>,
    pub model: Arc<RiskModel>,
}

impl Application {
    /// Prepare the model and the device client. The model is fully
    /// initialized before `start` lets any request reach it.
    pub async fn build(config: Config) -> Result<Self> {
        info!("Building Cardiosense Application...");

        let persistence = ModelPersistence::new(
            config.model.model_path.clone(),
            config.model.scaler_path.clone(),
        );
        let dataset_path = config.model.dataset_path.clone();
        let options = config.model.training_options();

        // Training is CPU-bound; keep it off the async workers.
        let model = tokio::task::spawn_blocking(move || {
            RiskModel::load_or_train(&persistence, &dataset_path, &options)
        })
        .await
        .context("Model initialization task panicked")?
        .context("Failed to initialize risk model")?;
        info!("Risk model ready (source: {:?})", model.source());

        let device: Arc<dyn SensorDevice> = Arc::new(HttpSensorDevice::new(
            config.device.address.clone(),
            config.device.timeout,
        ));
        info!(
            "Sensor device: {} (timeout: {:?})",
            device.address(),
            config.device.timeout
        );

        Ok(Self {
            config,
            device,
            store: Arc::new(SharedReadingStore::new()),
            model: Arc::new(model),
        })
    }

    /// Spawn the acquisition loop and hand back the request-side context.
    pub fn start(self) -> SystemHandle {
        let acquisition = AcquisitionLoop::new(
            SensorSource::new(self.device.clone()),
            self.store.clone(),
            self.config.device.poll_interval,
        )
        .spawn();

        let analyzer = Arc::new(RiskAnalyzer::new(self.model.clone()));
        info!(
            "Risk analyzer ready ({}, source: {:?})",
            analyzer.classifier_name(),
            self.model.source()
        );

        let context = ServiceContext {
            store: self.store.clone(),
            analyzer,
            model_source: self.model.source(),
        };

        SystemHandle {
            context,
            acquisition,
        }
    }
}

pub struct SystemHandle {
    pub context: ServiceContext,
    acquisition: AcquisitionHandle,
}

impl SystemHandle {
    /// Signal the acquisition loop, then wait (bounded) for it to finish.
    pub async fn shutdown(self) {
        info!("Stopping acquisition loop...");
        match tokio::time::timeout(ACQUISITION_JOIN_TIMEOUT, self.acquisition.stop()).await {
            Ok(Ok(cycles)) => info!("Acquisition loop joined after {} cycles", cycles),
            Ok(Err(e)) => warn!("Acquisition loop ended abnormally: {}", e),
            Err(_) => warn!(
                "Acquisition loop did not stop within {:?}",
                ACQUISITION_JOIN_TIMEOUT
            ),
        }
    }
}
