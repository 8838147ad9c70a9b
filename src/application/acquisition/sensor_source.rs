use crate::domain::ports::SensorDevice;
use crate::domain::types::{AcquisitionOutcome, Reading};
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{info, warn};

/// Bounds for readings synthesized when the device cannot be reached.
#[derive(Debug, Clone)]
pub struct SyntheticRanges {
    pub temperature: RangeInclusive<f64>,
    pub humidity: RangeInclusive<f64>,
    pub heart_rate: RangeInclusive<i32>,
    pub ecg: RangeInclusive<i32>,
}

impl Default for SyntheticRanges {
    fn default() -> Self {
        Self {
            temperature: 35.5..=37.5,
            humidity: 15.0..=25.0,
            heart_rate: 60..=100,
            ecg: 100..=900,
        }
    }
}

/// Performs one acquisition attempt and absorbs any failure by
/// synthesizing a bounded reading.
pub struct SensorSource {
    device: Arc<dyn SensorDevice>,
    ranges: SyntheticRanges,
}

impl SensorSource {
    pub fn new(device: Arc<dyn SensorDevice>) -> Self {
        Self::with_ranges(device, SyntheticRanges::default())
    }

    pub fn with_ranges(device: Arc<dyn SensorDevice>, ranges: SyntheticRanges) -> Self {
        Self { device, ranges }
    }

    /// Never fails: a device error becomes a `Synthetic` outcome.
    pub async fn acquire(&self) -> AcquisitionOutcome {
        match self.device.fetch().await {
            Ok(reading) => {
                info!("Received from device {}: {:?}", self.device.address(), reading);
                AcquisitionOutcome::Live(reading)
            }
            Err(e) => {
                let reading = self.synthesize();
                warn!(
                    "Device {} unreachable ({}). Using synthetic data: {:?}",
                    self.device.address(),
                    e,
                    reading
                );
                AcquisitionOutcome::Synthetic {
                    reading,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn synthesize(&self) -> Reading {
        let mut rng = rand::rng();
        Reading {
            temperature: round_one_decimal(rng.random_range(self.ranges.temperature.clone())),
            humidity: round_one_decimal(rng.random_range(self.ranges.humidity.clone())),
            heart_rate: rng.random_range(self.ranges.heart_rate.clone()),
            ecg: rng.random_range(self.ranges.ecg.clone()),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
