//! `SeaORM`-backed implementation of the [`AccessRepository`] port.

use std::collections::HashMap;

use access_control_sdk::{DataRule, Principal, PrincipalMenu, PrincipalRole, PrincipalScope, Status};
use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, instrument};

use crate::domain::repo::AccessRepository;
use crate::infra::storage::entity::{
    data_rule, data_scope, data_scope_rule, menu, role, role_data_scope, role_menu, user,
    user_role,
};

/// Reads the permission graph straight from the relational tables.
#[derive(Clone)]
pub struct SeaOrmAccessRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccessRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn menus_by_role(
        &self,
        role_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Vec<PrincipalMenu>>> {
        let links = role_menu::Entity::find()
            .filter(role_menu::Column::RoleId.is_in(role_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("load role menus")?;
        let menus: HashMap<i64, menu::Model> = menu::Entity::find()
            .filter(menu::Column::Id.is_in(links.iter().map(|l| l.menu_id)))
            .all(&self.db)
            .await
            .context("load menus")?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let mut by_role: HashMap<i64, Vec<PrincipalMenu>> = HashMap::new();
        for link in links {
            if let Some(m) = menus.get(&link.menu_id) {
                by_role
                    .entry(link.role_id)
                    .or_default()
                    .push(PrincipalMenu::try_from(m)?);
            }
        }
        Ok(by_role)
    }

    async fn scopes_by_role(
        &self,
        role_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Vec<PrincipalScope>>> {
        let links = role_data_scope::Entity::find()
            .filter(role_data_scope::Column::RoleId.is_in(role_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("load role data scopes")?;
        let scopes: HashMap<i64, data_scope::Model> = data_scope::Entity::find()
            .filter(data_scope::Column::Id.is_in(links.iter().map(|l| l.data_scope_id)))
            .all(&self.db)
            .await
            .context("load data scopes")?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut by_role: HashMap<i64, Vec<PrincipalScope>> = HashMap::new();
        for link in links {
            if let Some(s) = scopes.get(&link.data_scope_id) {
                by_role.entry(link.role_id).or_default().push(s.into());
            }
        }
        Ok(by_role)
    }
}

#[async_trait]
impl AccessRepository for SeaOrmAccessRepository {
    #[instrument(skip(self))]
    async fn find_principal(&self, user_id: i64) -> anyhow::Result<Option<Principal>> {
        let Some(user) = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("load user")?
        else {
            return Ok(None);
        };

        let role_ids: Vec<i64> = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("load user roles")?
            .into_iter()
            .map(|r| r.role_id)
            .collect();

        let mut roles = Vec::new();
        if !role_ids.is_empty() {
            let mut menus = self.menus_by_role(&role_ids).await?;
            let mut scopes = self.scopes_by_role(&role_ids).await?;
            let models = role::Entity::find()
                .filter(role::Column::Id.is_in(role_ids.iter().copied()))
                .order_by_asc(role::Column::Id)
                .all(&self.db)
                .await
                .context("load roles")?;
            roles = models
                .into_iter()
                .map(|r| PrincipalRole {
                    menus: menus.remove(&r.id).unwrap_or_default(),
                    scopes: scopes.remove(&r.id).unwrap_or_default(),
                    id: r.id,
                    name: r.name,
                    status: Status::from(r.status),
                    filters_scope: r.filters_scope,
                })
                .collect();
        }

        debug!(roles = roles.len(), "hydrated principal");
        Ok(Some(Principal {
            id: user.id,
            is_superuser: user.is_superuser,
            is_staff: user.is_staff,
            auth_scopes: Vec::new(),
            roles,
        }))
    }

    #[instrument(skip(self))]
    async fn scope_rules(&self, scope_id: i64) -> anyhow::Result<Option<Vec<DataRule>>> {
        if data_scope::Entity::find_by_id(scope_id)
            .one(&self.db)
            .await
            .context("load data scope")?
            .is_none()
        {
            return Ok(None);
        }

        let rule_ids: Vec<i64> = data_scope_rule::Entity::find()
            .filter(data_scope_rule::Column::DataScopeId.eq(scope_id))
            .all(&self.db)
            .await
            .context("load data scope rules")?
            .into_iter()
            .map(|l| l.data_rule_id)
            .collect();
        if rule_ids.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let rules = data_rule::Entity::find()
            .filter(data_rule::Column::Id.is_in(rule_ids))
            .order_by_asc(data_rule::Column::Id)
            .all(&self.db)
            .await
            .context("load data rules")?;
        Ok(Some(rules.into_iter().map(Into::into).collect()))
    }
}
