use crate::domain::errors::AcquisitionError;
use crate::domain::ports::SensorDevice;
use crate::domain::types::Reading;
use crate::infrastructure::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Sensor board exposing its latest reading as JSON over plain HTTP GET.
pub struct HttpSensorDevice {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl HttpSensorDevice {
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout),
            url,
            timeout,
        }
    }

    fn classify(&self, err: reqwest::Error) -> AcquisitionError {
        if err.is_timeout() {
            AcquisitionError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_decode() {
            AcquisitionError::MalformedPayload {
                reason: err.to_string(),
            }
        } else {
            AcquisitionError::Connection {
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl SensorDevice for HttpSensorDevice {
    async fn fetch(&self) -> Result<Reading, AcquisitionError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::BadStatus {
                status: status.as_u16(),
            });
        }

        response.json::<Reading>().await.map_err(|e| self.classify(e))
    }

    fn address(&self) -> &str {
        self.url.as_str()
    }
}
