use crate::domain::types::{Reading, ReadingSource};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Latest reading plus where and when it was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StoredReading {
    pub reading: Reading,
    pub source: Option<ReadingSource>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Holds the single most recent reading.
///
/// The whole `StoredReading` is replaced under one write lock, so a snapshot
/// never mixes fields from two acquisition cycles.
#[derive(Debug, Default)]
pub struct SharedReadingStore {
    current: RwLock<StoredReading>,
}

impl SharedReadingStore {
    /// Empty store: all-zero reading, no source yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, reading: Reading, source: ReadingSource) {
        let next = StoredReading {
            reading,
            source: Some(source),
            updated_at: Some(Utc::now()),
        };
        *self.current.write().await = next;
    }

    pub async fn snapshot(&self) -> Reading {
        self.current.read().await.reading
    }

    /// Reading together with its provenance.
    pub async fn status(&self) -> StoredReading {
        *self.current.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn reading(n: i32) -> Reading {
        Reading {
            temperature: f64::from(n),
            humidity: f64::from(n),
            heart_rate: n,
            ecg: n,
        }
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_zero() {
        let store = SharedReadingStore::new();
        assert_eq!(store.snapshot().await, Reading::default());

        let status = store.status().await;
        assert!(status.source.is_none());
        assert!(status.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_publish_replaces_whole_reading() {
        let store = SharedReadingStore::new();
        store.publish(reading(5), ReadingSource::Live).await;
        store.publish(reading(9), ReadingSource::Synthetic).await;

        assert_eq!(store.snapshot().await, reading(9));
        let status = store.status().await;
        assert_eq!(status.source, Some(ReadingSource::Synthetic));
        assert!(status.updated_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_snapshots_are_never_torn() {
        let store = Arc::new(SharedReadingStore::new());

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for n in 1..=2_000 {
                    store.publish(reading(n), ReadingSource::Synthetic).await;
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..2_000 {
                    let r = store.snapshot().await;
                    let n = r.heart_rate;
                    assert_eq!(r.ecg, n);
                    assert_eq!(r.temperature, f64::from(n));
                    assert_eq!(r.humidity, f64::from(n));
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
