#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use access_control::AccessControlModule;
use access_control::config::AccessControlConfig;
use access_control::infra::cache::InMemoryAuthzCache;
use access_control::infra::storage::entity::{dept, user};
use access_control::{AccessControlApi, Principal};
use access_control_sdk::{
    DataRuleDraft, DataScopeDraft, RoleDraft, RuleExpression, RuleOperator, Status,
};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

pub struct TestContext {
    pub db: DatabaseConnection,
    pub cache: Arc<InMemoryAuthzCache>,
    pub module: AccessControlModule,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(AccessControlConfig::default()).await
    }

    pub async fn with_config(config: AccessControlConfig) -> Self {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        AccessControlModule::migrate(&db)
            .await
            .expect("Failed to run migrations");

        let cache = Arc::new(InMemoryAuthzCache::new());
        let module = AccessControlModule::new(config, db.clone(), cache.clone(), None)
            .expect("Failed to build module");
        Self { db, cache, module }
    }

    pub fn api(&self) -> Arc<dyn AccessControlApi> {
        self.module.api()
    }

    pub async fn add_user(&self, id: i64, is_staff: bool) {
        user::ActiveModel {
            id: Set(id),
            username: Set(format!("user{id}")),
            nickname: Set(format!("User {id}")),
            is_superuser: Set(false),
            is_staff: Set(is_staff),
            status: Set(1),
        }
        .insert(&self.db)
        .await
        .expect("insert user");
    }

    pub async fn resolve(&self, user_id: i64) -> Principal {
        self.module
            .principals()
            .resolve(user_id, vec!["jwt".to_owned()])
            .await
            .expect("resolve principal")
    }

    /// Create `rules` on `department`, one scope holding them and a role
    /// holding the scope. Returns the role id.
    pub async fn scoped_role(&self, name: &str, rules: &[RuleSpec<'_>]) -> i64 {
        let admin = self.module.admin();
        let mut rule_ids = Vec::new();
        for (i, (column, operator, expression, value)) in rules.iter().enumerate() {
            let rule = admin
                .create_rule(DataRuleDraft {
                    name: format!("{name} rule {i}"),
                    model: "department".to_owned(),
                    column: (*column).to_owned(),
                    operator: *operator,
                    expression: *expression,
                    value: (*value).to_owned(),
                })
                .await
                .expect("create rule");
            rule_ids.push(rule.id);
        }
        let scope = admin
            .create_scope(DataScopeDraft {
                name: format!("{name} scope"),
                status: Status::Enabled,
            })
            .await
            .expect("create scope");
        admin
            .update_scope_rules(scope.id, &rule_ids)
            .await
            .expect("attach rules");
        let role = admin
            .create_role(RoleDraft {
                name: format!("{name} role"),
                status: Status::Enabled,
                filters_scope: true,
                remark: None,
            })
            .await
            .expect("create role");
        admin
            .update_role_scopes(role.id, &[scope.id])
            .await
            .expect("attach scope");
        role.id
    }
}

/// `(column, operator, expression, value)` of a data rule.
pub type RuleSpec<'a> = (&'a str, RuleOperator, RuleExpression, &'a str);

/// Department tree used by row-filter tests:
///
/// | id | name   | parent | leader | status |
/// |----|--------|--------|--------|--------|
/// | 1  | HQ     | -      | 7      | 1      |
/// | 2  | Ops    | 1      | 8      | 1      |
/// | 3  | QA     | 1      | 7      | 0      |
/// | 4  | Sales  | 2      | 9      | 1      |
/// | 5  | Legacy | 2      | -      | 0      |
pub async fn seed_departments(db: &DatabaseConnection) {
    let created = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid timestamp");
    let rows: [(i64, &str, Option<i64>, Option<&str>, i32); 5] = [
        (1, "HQ", None, Some("7"), 1),
        (2, "Ops", Some(1), Some("8"), 1),
        (3, "QA", Some(1), Some("7"), 0),
        (4, "Sales", Some(2), Some("9"), 1),
        (5, "Legacy", Some(2), None, 0),
    ];
    for (id, name, parent_id, leader, status) in rows {
        dept::ActiveModel {
            id: Set(id),
            name: Set(name.to_owned()),
            sort: Set(0),
            leader: Set(leader.map(str::to_owned)),
            phone: Set(None),
            email: Set(None),
            status: Set(status),
            del_flag: Set(false),
            parent_id: Set(parent_id),
            created_time: Set(created),
            updated_time: Set(None),
        }
        .insert(db)
        .await
        .expect("insert department");
    }
}
