use access_control_sdk::{DataRule, Principal};
use async_trait::async_trait;

#[async_trait]
pub trait AccessRepository: Send + Sync {
    /// Hydrate a user with roles, menus and scopes. `None` if the user does not exist.
    async fn find_principal(&self, user_id: i64) -> anyhow::Result<Option<Principal>>;

    /// Rules attached to a data scope. `None` if the scope does not exist.
    async fn scope_rules(&self, scope_id: i64) -> anyhow::Result<Option<Vec<DataRule>>>;
}
