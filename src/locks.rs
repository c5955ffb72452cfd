use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};

/// Registry of async mutexes keyed by document id.
///
/// Writers that read, modify and save a document take its lock first. Entries are
/// created on first use and removed with [`KeyedLocks::remove`] once the document is
/// deleted.
#[derive(Default)]
pub struct KeyedLocks {
    mutexes: RwLock<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        self.handle(key).await.lock_owned().await
    }

    /// Locks every key in sorted order, so two callers sharing keys cannot deadlock
    pub async fn lock_all(&self, keys: &[&str]) -> Vec<OwnedMutexGuard<()>> {
        let mut sorted = keys.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut guards = Vec::with_capacity(sorted.len());
        for key in sorted {
            guards.push(self.lock(key).await);
        }
        guards
    }

    pub async fn remove(&self, key: &str) {
        self.mutexes.write().await.remove(key);
    }

    pub async fn len(&self) -> usize {
        self.mutexes.read().await.len()
    }

    async fn handle(&self, key: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.mutexes.read().await;
            if let Some(mutex) = guard.get(key) {
                return mutex.clone();
            }
        }

        let mut guard = self.mutexes.write().await;
        guard
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let held = locks.lock("a").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("a").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(held);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_lock_all_dedups_and_remove_prunes() {
        let locks = KeyedLocks::new();
        {
            let guards = locks.lock_all(&["b", "a", "b"]).await;
            assert_eq!(guards.len(), 2);
        }
        assert_eq!(locks.len().await, 2);

        locks.remove("a").await;
        locks.remove("b").await;
        assert_eq!(locks.len().await, 0);
    }
}
