use super::reading_store::SharedReadingStore;
use super::sensor_source::SensorSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

/// Drives `SensorSource` on a fixed cadence and publishes every reading.
pub struct AcquisitionLoop {
    source: SensorSource,
    store: Arc<SharedReadingStore>,
    interval: Duration,
}

impl AcquisitionLoop {
    pub fn new(source: SensorSource, store: Arc<SharedReadingStore>, interval: Duration) -> Self {
        Self {
            source,
            store,
            interval,
        }
    }

    /// Run until `cancel` fires. The token is only checked between
    /// iterations, so an acquisition and its sleep always complete.
    /// Returns the number of completed cycles.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        info!("Acquisition loop started (interval: {:?})", self.interval);

        let mut cycles = 0u64;
        while !cancel.is_cancelled() {
            let outcome = self.source.acquire().await;
            let reading = outcome.reading();
            self.store.publish(reading, outcome.source()).await;
            cycles += 1;

            debug!(
                "[{}] Temp: {}°C | Humidity: {}% | Heart Rate: {} BPM | ECG: {}",
                outcome.source(),
                reading.temperature,
                reading.humidity,
                reading.heart_rate,
                reading.ecg
            );

            tokio::time::sleep(self.interval).await;
        }

        info!("Acquisition loop stopped after {} cycles", cycles);
        cycles
    }

    pub fn spawn(self) -> AcquisitionHandle {
        let cancel = CancellationToken::new();
        let join = tokio::spawn(self.run(cancel.clone()));
        AcquisitionHandle { cancel, join }
    }
}

/// Owner side of a spawned acquisition loop: signal, then join.
pub struct AcquisitionHandle {
    cancel: CancellationToken,
    join: JoinHandle<u64>,
}

impl AcquisitionHandle {
    pub fn state(&self) -> LoopState {
        if self.join.is_finished() {
            LoopState::Stopped
        } else if self.cancel.is_cancelled() {
            LoopState::Stopping
        } else {
            LoopState::Running
        }
    }

    /// Request a cooperative stop without waiting for it.
    pub fn signal_stop(&self) {
        self.cancel.cancel();
    }

    /// Signal the loop and wait for its current iteration to finish.
    pub async fn stop(self) -> anyhow::Result<u64> {
        self.cancel.cancel();
        let cycles = self.join.await?;
        Ok(cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AcquisitionError;
    use crate::domain::ports::SensorDevice;
    use crate::domain::types::{Reading, ReadingSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingDevice {
        calls: AtomicU32,
    }

    #[async_trait]
    impl SensorDevice for CountingDevice {
        async fn fetch(&self) -> Result<Reading, AcquisitionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as i32 + 1;
            Ok(Reading {
                temperature: 36.0,
                humidity: 20.0,
                heart_rate: 60 + n,
                ecg: 500,
            })
        }

        fn address(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_publishes_each_cycle() {
        let device = Arc::new(CountingDevice {
            calls: AtomicU32::new(0),
        });
        let store = Arc::new(SharedReadingStore::new());
        let acquisition = AcquisitionLoop::new(
            SensorSource::new(device.clone()),
            store.clone(),
            Duration::from_secs(1),
        );

        let handle = acquisition.spawn();
        assert_eq!(handle.state(), LoopState::Running);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        let cycles = handle.stop().await.unwrap();

        assert_eq!(cycles, 4);
        assert_eq!(device.calls.load(Ordering::SeqCst), 4);
        assert_eq!(store.snapshot().await.heart_rate, 64);
        assert_eq!(store.status().await.source, Some(ReadingSource::Live));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_finishes_current_sleep() {
        let store = Arc::new(SharedReadingStore::new());
        let device = Arc::new(CountingDevice {
            calls: AtomicU32::new(0),
        });
        let handle =
            AcquisitionLoop::new(SensorSource::new(device.clone()), store, Duration::from_secs(5))
                .spawn();

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.signal_stop();
        assert_eq!(handle.state(), LoopState::Stopping);

        let cycles = handle.stop().await.unwrap();
        assert_eq!(cycles, 1);
        assert_eq!(device.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stopped_before_first_cycle_publishes_nothing() {
        let store = Arc::new(SharedReadingStore::new());
        let device = Arc::new(CountingDevice {
            calls: AtomicU32::new(0),
        });
        let cancel = CancellationToken::new();
        cancel.cancel();

        let cycles = AcquisitionLoop::new(
            SensorSource::new(device),
            store.clone(),
            Duration::from_millis(10),
        )
        .run(cancel)
        .await;

        assert_eq!(cycles, 0);
        assert_eq!(store.snapshot().await, Reading::default());
    }
}
