//! Sensor device configuration parsing from environment variables.

use super::parse_or;
use anyhow::{Context, Result, bail};
use std::time::Duration;
use url::Url;

pub const DEFAULT_DEVICE_ADDRESS: &str = "http://192.168.137.12";

/// Device environment configuration
#[derive(Debug, Clone)]
pub struct DeviceEnvConfig {
    pub address: Url,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl DeviceEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_address =
            lookup("DEVICE_ADDRESS").unwrap_or_else(|| DEFAULT_DEVICE_ADDRESS.to_string());
        let address = Url::parse(&raw_address)
            .with_context(|| format!("Invalid DEVICE_ADDRESS: {}", raw_address))?;

        let timeout_ms: u64 = parse_or(lookup, "DEVICE_TIMEOUT_MS", 1000)?;
        let poll_interval_secs: f64 = parse_or(lookup, "POLL_INTERVAL_SECONDS", 1.0)?;
        if !poll_interval_secs.is_finite() || poll_interval_secs <= 0.0 {
            bail!(
                "Invalid POLL_INTERVAL_SECONDS: {}. Must be > 0",
                poll_interval_secs
            );
        }

        Ok(Self {
            address,
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_secs_f64(poll_interval_secs),
        })
    }
}
