#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use access_control_sdk::{
    DataRule, MenuType, Principal, PrincipalMenu, PrincipalRole, PrincipalScope, RuleExpression,
    RuleOperator, Status,
};
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::domain::repo::AccessRepository;

/// Authenticated, non-staff principal without roles.
#[must_use]
pub fn principal(id: i64) -> Principal {
    Principal {
        id,
        is_superuser: false,
        is_staff: false,
        auth_scopes: vec!["access".to_owned()],
        roles: Vec::new(),
    }
}

/// Enabled role that filters by scope.
#[must_use]
pub fn role(id: i64, menus: Vec<PrincipalMenu>, scopes: Vec<PrincipalScope>) -> PrincipalRole {
    PrincipalRole {
        id,
        name: format!("role-{id}"),
        status: Status::Enabled,
        filters_scope: true,
        menus,
        scopes,
    }
}

#[must_use]
pub fn menu(id: i64, perms: Option<&str>) -> PrincipalMenu {
    PrincipalMenu {
        id,
        perms: perms.map(str::to_owned),
        status: Status::Enabled,
        menu_type: MenuType::Button,
    }
}

#[must_use]
pub fn scope(id: i64) -> PrincipalScope {
    PrincipalScope {
        id,
        status: Status::Enabled,
    }
}

#[must_use]
pub fn rule(
    id: i64,
    column: &str,
    operator: RuleOperator,
    expression: RuleExpression,
    value: &str,
) -> DataRule {
    DataRule {
        id,
        name: format!("rule-{id}"),
        model: "department".to_owned(),
        column: column.to_owned(),
        operator: operator.code(),
        expression: expression.code(),
        value: value.to_owned(),
    }
}

/// In-memory repository keyed by user id and scope id.
#[derive(Default)]
pub struct MockRepository {
    pub principals: HashMap<i64, Principal>,
    pub scopes: HashMap<i64, Vec<DataRule>>,
    pub principal_reads: AtomicUsize,
}

impl MockRepository {
    #[must_use]
    pub fn with_scope(mut self, scope_id: i64, rules: Vec<DataRule>) -> Self {
        self.scopes.insert(scope_id, rules);
        self
    }

    #[must_use]
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principals.insert(principal.id, principal);
        self
    }

    pub fn principal_reads(&self) -> usize {
        self.principal_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessRepository for MockRepository {
    async fn find_principal(&self, user_id: i64) -> anyhow::Result<Option<Principal>> {
        self.principal_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.principals.get(&user_id).cloned())
    }

    async fn scope_rules(&self, scope_id: i64) -> anyhow::Result<Option<Vec<DataRule>>> {
        Ok(self.scopes.get(&scope_id).cloned())
    }
}

pub async fn inmem_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    crate::infra::storage::migrations::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
