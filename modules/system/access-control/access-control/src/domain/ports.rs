use async_trait::async_trait;

/// Key/value store holding per-user principal snapshots.
#[async_trait]
pub trait AuthzCache: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> anyhow::Result<()>;

    async fn delete(&self, keys: &[String]) -> anyhow::Result<()>;

    /// Remove every key starting with `prefix`.
    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<()>;
}
