//! Cache-first principal hydration.

use std::sync::Arc;

use access_control_sdk::{AccessError, Principal};
use tracing::{debug, instrument, warn};

use super::ports::AuthzCache;
use super::repo::AccessRepository;
use crate::config::AccessControlConfig;

/// Resolves authenticated users into [`Principal`]s.
///
/// Snapshots are stored as JSON under `"{user_cache_prefix}:{user_id}"` and
/// never carry token scopes; those come from the caller on every request.
/// Cache failures degrade to a storage read.
#[derive(Clone)]
pub struct PrincipalResolver {
    repo: Arc<dyn AccessRepository>,
    cache: Arc<dyn AuthzCache>,
    config: Arc<AccessControlConfig>,
}

impl PrincipalResolver {
    #[must_use]
    pub fn new(
        repo: Arc<dyn AccessRepository>,
        cache: Arc<dyn AuthzCache>,
        config: Arc<AccessControlConfig>,
    ) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    /// # Errors
    ///
    /// `NotFound` if the user does not exist, `ServerError` if storage fails.
    #[instrument(skip(self, auth_scopes))]
    pub async fn resolve(
        &self,
        user_id: i64,
        auth_scopes: Vec<String>,
    ) -> Result<Principal, AccessError> {
        let key = self.config.user_cache_key(user_id);

        let mut principal = match self.cached(&key).await {
            Some(principal) => principal,
            None => self.hydrate(user_id, &key).await?,
        };
        principal.auth_scopes = auth_scopes;
        Ok(principal)
    }

    async fn cached(&self, key: &str) -> Option<Principal> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %format!("{e:#}"), "principal cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(principal) => {
                debug!(key, "principal cache hit");
                Some(principal)
            }
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable principal snapshot");
                None
            }
        }
    }

    async fn hydrate(&self, user_id: i64, key: &str) -> Result<Principal, AccessError> {
        let mut principal = self
            .repo
            .find_principal(user_id)
            .await
            .map_err(|e| AccessError::server_error(format!("{e:#}")))?
            .ok_or_else(|| AccessError::not_found(format!("user {user_id}")))?;
        principal.auth_scopes.clear();

        match serde_json::to_string(&principal) {
            Ok(raw) => {
                if let Err(e) = self
                    .cache
                    .set(key, &raw, self.config.principal_cache_ttl_secs)
                    .await
                {
                    warn!(key, error = %format!("{e:#}"), "principal cache write failed");
                }
            }
            Err(e) => warn!(key, error = %e, "principal snapshot not serializable"),
        }
        Ok(principal)
    }
}
