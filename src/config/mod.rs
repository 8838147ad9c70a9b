//! Configuration module for Cardiosense.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Device, Server and Model.

mod device_config;
mod model_config;
mod server_config;

pub use device_config::{DEFAULT_DEVICE_ADDRESS, DeviceEnvConfig};
pub use model_config::ModelEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub device: DeviceEnvConfig,
    pub server: ServerEnvConfig,
    pub model: ModelEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            device: DeviceEnvConfig::from_lookup(&lookup).context("Failed to load device config")?,
            server: ServerEnvConfig::from_lookup(&lookup).context("Failed to load server config")?,
            model: ModelEnvConfig::from_lookup(&lookup).context("Failed to load model config")?,
        })
    }
}

/// Parse `key` if set, otherwise return `default`. A set but unparsable
/// value is an error rather than a silent fallback.
pub(crate) fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {} ({})", key, raw, e)),
        None => Ok(default),
    }
}
