use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::ports::AuthzCache;

/// Inserts between two sweeps of expired entries.
const SWEEP_EVERY: usize = 256;

struct Entry {
    value: String,
    /// `None` when the TTL does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Process-local cache store. Expired entries are dropped on read and by a
/// periodic sweep on write.
#[derive(Default)]
pub struct InMemoryAuthzCache {
    entries: DashMap<String, Entry>,
    inserts: AtomicUsize,
}

impl InMemoryAuthzCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|e| e.is_live(Instant::now()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.entries.retain(|_, e| e.is_live(now));
    }
}

#[async_trait]
impl AuthzCache for InMemoryAuthzCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, e| !e.is_live(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> anyhow::Result<()> {
        if self.inserts.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.sweep();
        }
        self.entries.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: Instant::now().checked_add(Duration::from_secs(ttl_secs)),
            },
        );
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> anyhow::Result<()> {
        for key in keys {
            self.entries.remove(key);
        }
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<()> {
        self.entries.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}
