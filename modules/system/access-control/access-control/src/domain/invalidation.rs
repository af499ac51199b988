//! Post-commit purge of cached principal snapshots.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::error::DomainError;
use super::ports::AuthzCache;

/// How much of a user's cached state to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purge {
    /// The principal snapshot only.
    Snapshot,
    /// The snapshot plus every `"{prefix}:{user_id}:"` sub key.
    SnapshotAndSubkeys,
}

#[derive(Clone)]
pub struct CacheInvalidator {
    cache: Arc<dyn AuthzCache>,
    prefix: String,
}

impl CacheInvalidator {
    #[must_use]
    pub fn new(cache: Arc<dyn AuthzCache>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn snapshot_key(&self, user_id: i64) -> String {
        format!("{}:{user_id}", self.prefix)
    }

    /// Drop cached state of `users`. Must be called after the write commits.
    ///
    /// # Errors
    ///
    /// `DomainError::Cache` if the cache store fails; the purge is not retried.
    #[instrument(skip(self, users), fields(users = users.len()))]
    pub async fn invalidate(&self, users: &BTreeSet<i64>, purge: Purge) -> Result<(), DomainError> {
        if users.is_empty() {
            return Ok(());
        }

        let keys: Vec<String> = users.iter().map(|id| self.snapshot_key(*id)).collect();
        self.cache
            .delete(&keys)
            .await
            .map_err(|e| DomainError::cache(format!("{e:#}")))?;

        if purge == Purge::SnapshotAndSubkeys {
            for user_id in users {
                let prefix = format!("{}:", self.snapshot_key(*user_id));
                self.cache
                    .delete_prefix(&prefix)
                    .await
                    .map_err(|e| DomainError::cache(format!("{e:#}")))?;
            }
        }

        debug!(?users, ?purge, "invalidated cached principals");
        Ok(())
    }
}
