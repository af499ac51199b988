//! Reverse walks over the permission graph: from a changed rule, scope,
//! menu or role to the users whose effective permissions depend on it.

use std::collections::BTreeSet;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use super::entity::{data_scope_rule, role_data_scope, role_menu, user_role};

/// Reverse-walk queries bound to a connection or an open transaction.
///
/// Run them inside the mutating transaction, before join rows are deleted.
pub struct PermissionGraph<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PermissionGraph<'a, C> {
    #[must_use]
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// role -> users
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn users_of_roles(&self, role_ids: &[i64]) -> Result<BTreeSet<i64>, DbErr> {
        if role_ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let rows = user_role::Entity::find()
            .filter(user_role::Column::RoleId.is_in(role_ids.iter().copied()))
            .all(self.conn)
            .await?;
        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    /// scope -> roles
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn roles_of_scopes(&self, scope_ids: &[i64]) -> Result<Vec<i64>, DbErr> {
        if scope_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = role_data_scope::Entity::find()
            .filter(role_data_scope::Column::DataScopeId.is_in(scope_ids.iter().copied()))
            .all(self.conn)
            .await?;
        Ok(dedup(rows.into_iter().map(|r| r.role_id)))
    }

    /// rule -> scopes
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn scopes_of_rules(&self, rule_ids: &[i64]) -> Result<Vec<i64>, DbErr> {
        if rule_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = data_scope_rule::Entity::find()
            .filter(data_scope_rule::Column::DataRuleId.is_in(rule_ids.iter().copied()))
            .all(self.conn)
            .await?;
        Ok(dedup(rows.into_iter().map(|r| r.data_scope_id)))
    }

    /// menu -> roles
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn roles_of_menus(&self, menu_ids: &[i64]) -> Result<Vec<i64>, DbErr> {
        if menu_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = role_menu::Entity::find()
            .filter(role_menu::Column::MenuId.is_in(menu_ids.iter().copied()))
            .all(self.conn)
            .await?;
        Ok(dedup(rows.into_iter().map(|r| r.role_id)))
    }

    /// scope -> roles -> users
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn users_of_scopes(&self, scope_ids: &[i64]) -> Result<BTreeSet<i64>, DbErr> {
        let roles = self.roles_of_scopes(scope_ids).await?;
        self.users_of_roles(&roles).await
    }

    /// rule -> scopes -> roles -> users
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn users_of_rules(&self, rule_ids: &[i64]) -> Result<BTreeSet<i64>, DbErr> {
        let scopes = self.scopes_of_rules(rule_ids).await?;
        self.users_of_scopes(&scopes).await
    }

    /// menu -> roles -> users
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    pub async fn users_of_menus(&self, menu_ids: &[i64]) -> Result<BTreeSet<i64>, DbErr> {
        let roles = self.roles_of_menus(menu_ids).await?;
        self.users_of_roles(&roles).await
    }
}

fn dedup(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}
