//! HTTP server configuration parsing from environment variables.

use super::parse_or;
use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let host = raw_host
            .parse::<IpAddr>()
            .with_context(|| format!("Invalid HOST: {}", raw_host))?;
        let port = parse_or(lookup, "LISTEN_PORT", 5000)?;

        Ok(Self { host, port })
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
