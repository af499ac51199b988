//! Administrative mutations of the permission graph.
//!
//! Every mutation runs in one transaction. Users whose cached snapshot
//! depends on the changed records are collected inside the transaction,
//! before join rows are removed, and purged after commit. A reader racing
//! the commit may repopulate a snapshot that the purge then removes; a
//! reader racing the purge itself may briefly serve the old snapshot until
//! its TTL expires.
//!
//! Submodules hold the operations per resource:
//! - `rules` - data rules and the entity/column catalog
//! - `scopes` - data scopes and their rule sets
//! - `roles` - roles with their menu and scope sets
//! - `users` - user role membership and account flags
//! - `menus` - menus and their permission codes

use std::collections::BTreeSet;
use std::sync::Arc;

use access_control_sdk::{
    DataRule, DataRuleDraft, DataScope, DataScopeDraft, Menu, MenuDraft, Role, RoleDraft,
    RuleColumn, UserFlagsUpdate,
};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::error::DomainError;
use super::invalidation::{CacheInvalidator, Purge};
use super::registry::EntityRegistry;

mod menus;
mod roles;
mod rules;
mod scopes;
mod users;

/// Transactional admin operations with post-commit cache invalidation.
#[derive(Clone)]
pub struct AdminService {
    db: DatabaseConnection,
    registry: Arc<EntityRegistry>,
    invalidator: CacheInvalidator,
}

impl AdminService {
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        registry: Arc<EntityRegistry>,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self {
            db,
            registry,
            invalidator,
        }
    }

    async fn purge(&self, users: &BTreeSet<i64>, purge: Purge) -> Result<(), DomainError> {
        self.invalidator.invalidate(users, purge).await
    }

    // -- rules --

    /// # Errors
    ///
    /// `NotFound` for an unregistered model or column, `Conflict` for a taken name.
    pub async fn create_rule(&self, draft: DataRuleDraft) -> Result<DataRule, DomainError> {
        rules::create_rule(self, draft).await
    }

    /// # Errors
    ///
    /// `NotFound` for a missing rule or an unregistered target, `Conflict`
    /// for a taken name.
    pub async fn update_rule(&self, id: i64, draft: DataRuleDraft) -> Result<DataRule, DomainError> {
        rules::update_rule(self, id, draft).await
    }

    /// Delete rules and detach them from their scopes. Returns the number of
    /// rules removed; unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// `Database` or `Cache` on infrastructure failure.
    pub async fn delete_rules(&self, ids: &[i64]) -> Result<u64, DomainError> {
        rules::delete_rules(self, ids).await
    }

    /// Entity names rules may target.
    #[must_use]
    pub fn rule_models(&self) -> Vec<String> {
        self.registry.names()
    }

    /// # Errors
    ///
    /// `NotFound` if `model` is not registered.
    pub fn rule_columns(&self, model: &str) -> Result<Vec<RuleColumn>, DomainError> {
        self.registry
            .entity(model)
            .map(super::registry::EntityDescriptor::columns)
            .ok_or_else(|| DomainError::not_found(format!("data rule model '{model}'")))
    }

    // -- scopes --

    /// # Errors
    ///
    /// `Conflict` for a taken name.
    pub async fn create_scope(&self, draft: DataScopeDraft) -> Result<DataScope, DomainError> {
        scopes::create_scope(self, draft).await
    }

    /// # Errors
    ///
    /// `NotFound` for a missing scope, `Conflict` for a taken name.
    pub async fn update_scope(
        &self,
        id: i64,
        draft: DataScopeDraft,
    ) -> Result<DataScope, DomainError> {
        scopes::update_scope(self, id, draft).await
    }

    /// Replace the rule set of a scope.
    ///
    /// # Errors
    ///
    /// `NotFound` if the scope or any rule does not exist.
    pub async fn update_scope_rules(&self, id: i64, rule_ids: &[i64]) -> Result<(), DomainError> {
        scopes::update_scope_rules(self, id, rule_ids).await
    }

    /// # Errors
    ///
    /// `Database` or `Cache` on infrastructure failure.
    pub async fn delete_scopes(&self, ids: &[i64]) -> Result<u64, DomainError> {
        scopes::delete_scopes(self, ids).await
    }

    // -- roles --

    /// # Errors
    ///
    /// `Conflict` for a taken name.
    pub async fn create_role(&self, draft: RoleDraft) -> Result<Role, DomainError> {
        roles::create_role(self, draft).await
    }

    /// # Errors
    ///
    /// `NotFound` for a missing role, `Conflict` for a taken name.
    pub async fn update_role(&self, id: i64, draft: RoleDraft) -> Result<Role, DomainError> {
        roles::update_role(self, id, draft).await
    }

    /// Replace the menu set of a role.
    ///
    /// # Errors
    ///
    /// `NotFound` if the role or any menu does not exist.
    pub async fn update_role_menus(&self, id: i64, menu_ids: &[i64]) -> Result<(), DomainError> {
        roles::update_role_menus(self, id, menu_ids).await
    }

    /// Replace the data scope set of a role.
    ///
    /// # Errors
    ///
    /// `NotFound` if the role or any scope does not exist.
    pub async fn update_role_scopes(&self, id: i64, scope_ids: &[i64]) -> Result<(), DomainError> {
        roles::update_role_scopes(self, id, scope_ids).await
    }

    /// # Errors
    ///
    /// `Database` or `Cache` on infrastructure failure.
    pub async fn delete_roles(&self, ids: &[i64]) -> Result<u64, DomainError> {
        roles::delete_roles(self, ids).await
    }

    // -- users --

    /// Replace the role set of a user.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user or any role does not exist.
    pub async fn update_user_roles(&self, user_id: i64, role_ids: &[i64]) -> Result<(), DomainError> {
        users::update_user_roles(self, user_id, role_ids).await
    }

    /// Set the superuser, staff or status flag of a user on behalf of `actor_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist, `Denied(SelfModification)` if
    /// `actor_id` is the user being changed.
    pub async fn update_user_flags(
        &self,
        actor_id: i64,
        user_id: i64,
        flags: UserFlagsUpdate,
    ) -> Result<(), DomainError> {
        users::update_user_flags(self, actor_id, user_id, flags).await
    }

    // -- menus --

    /// # Errors
    ///
    /// `NotFound` if `parent_id` names a missing menu.
    pub async fn create_menu(&self, draft: MenuDraft) -> Result<Menu, DomainError> {
        menus::create_menu(self, draft).await
    }

    /// # Errors
    ///
    /// `NotFound` for a missing menu or parent.
    pub async fn update_menu(&self, id: i64, draft: MenuDraft) -> Result<Menu, DomainError> {
        menus::update_menu(self, id, draft).await
    }

    /// # Errors
    ///
    /// `Database` or `Cache` on infrastructure failure.
    pub async fn delete_menus(&self, ids: &[i64]) -> Result<u64, DomainError> {
        menus::delete_menus(self, ids).await
    }
}

/// Fail with `NotFound` unless every id in `ids` has a row in `E`.
async fn ensure_all_exist<E, C>(
    conn: &C,
    id_column: E::Column,
    ids: &[i64],
    what: &str,
) -> Result<(), DomainError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(());
    }
    let found = E::find()
        .filter(id_column.is_in(wanted.iter().copied()))
        .all(conn)
        .await?
        .len();
    if found != wanted.len() {
        return Err(DomainError::not_found(format!("{what} in {ids:?}")));
    }
    Ok(())
}

/// Distinct ids in ascending order.
fn dedup(ids: &[i64]) -> impl Iterator<Item = i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter()
}
