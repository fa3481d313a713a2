use bytes::Bytes;
use chrono::{DateTime, Utc};
use getset::{CopyGetters, Getters};
use tokio::sync::RwLock;
use tracing::info;

/// Immutable exposition produced by one refresh cycle.
#[derive(Debug, Clone, Default, Getters, CopyGetters)]
pub struct Snapshot {
    #[getset(get_copy = "pub")]
    version: u64,
    #[getset(get_copy = "pub")]
    published_at: Option<DateTime<Utc>>,
    #[getset(get = "pub")]
    body: Bytes,
}

/// Holds the current snapshot. Readers share the lock; `publish` swaps the
/// handle, so readers see either the whole previous body or the whole new one.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current snapshot, returning the new version.
    pub async fn publish(&self, exposition: String) -> u64 {
        let body = Bytes::from(exposition);
        let size = body.len();

        let mut current = self.current.write().await;
        let version = current.version + 1;
        *current = Snapshot {
            version,
            published_at: Some(Utc::now()),
            body,
        };
        drop(current);

        info!("Published snapshot v{version}, {size} bytes");
        version
    }

    /// Body of the current snapshot. Empty until the first publish.
    pub async fn read(&self) -> Bytes {
        self.current.read().await.body.clone()
    }

    pub async fn read_snapshot(&self) -> Snapshot {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn read_before_publish_is_empty() {
        let store = SnapshotStore::new();

        assert!(store.read().await.is_empty());
        let snapshot = store.read_snapshot().await;
        assert_eq!(snapshot.version(), 0);
        assert!(snapshot.published_at().is_none());
    }

    #[tokio::test]
    async fn publish_replaces_body_even_when_empty() {
        let store = SnapshotStore::new();

        assert_eq!(store.publish("kafka_node{} 1\n".to_owned()).await, 1);
        assert_eq!(store.read().await, "kafka_node{} 1\n");

        assert_eq!(store.publish(String::new()).await, 2);
        assert!(store.read().await.is_empty());
        assert!(store.read_snapshot().await.published_at().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reads_never_observe_partial_bodies() {
        let store = Arc::new(SnapshotStore::new());
        let bodies = (0..50)
            .map(|i| format!("line_{i}\n").repeat(200))
            .collect::<Vec<_>>();

        let writer = {
            let store = store.clone();
            let bodies = bodies.clone();
            tokio::spawn(async move {
                for body in bodies {
                    store.publish(body).await;
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers = (0..8)
            .map(|_| {
                let store = store.clone();
                let bodies = bodies.clone();
                tokio::spawn(async move {
                    for _ in 0..200 {
                        let body = store.read().await;
                        assert!(body.is_empty() || bodies.iter().any(|b| b.as_bytes() == body));
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect::<Vec<_>>();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(store.read().await, bodies[49].as_bytes());
    }
}
