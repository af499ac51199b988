#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Administrative mutations purge exactly the cached principals they affect,
//! and re-resolved principals see the change.

mod support;

use access_control::domain::ports::AuthzCache;
use access_control::infra::storage::entity::data_rule;
use access_control_sdk::{
    AccessError, AccessRequest, DataScopeDraft, DenyReason, MenuDraft, MenuType, Predicate,
    RoleDraft, RuleExpression as Ex, RuleOperator as Op, Status, UserFlagsUpdate,
};
use http::Method;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use support::TestContext;

fn dept_menu(perms: &str) -> MenuDraft {
    MenuDraft {
        title: "Departments".to_owned(),
        name: "SysDept".to_owned(),
        perms: Some(perms.to_owned()),
        status: Status::Enabled,
        menu_type: MenuType::Button,
        parent_id: None,
        sort: 0,
    }
}

fn add_dept() -> AccessRequest {
    AccessRequest::new(Method::POST, "/api/v1/sys/depts").with_permission("sys:dept:add")
}

async fn cached(ctx: &TestContext, user_id: i64) -> bool {
    ctx.cache
        .get(&format!("access:user:{user_id}"))
        .await
        .unwrap()
        .is_some()
}

/// Users 1 and 2 exist; user 1 holds a role with the department menu.
async fn context() -> (TestContext, i64, i64) {
    let ctx = TestContext::new().await;
    ctx.add_user(1, true).await;
    ctx.add_user(2, true).await;
    let admin = ctx.module.admin();
    let menu = admin.create_menu(dept_menu("sys:dept:add")).await.unwrap();
    let role = admin
        .create_role(RoleDraft {
            name: "dept admin".to_owned(),
            status: Status::Enabled,
            filters_scope: true,
            remark: None,
        })
        .await
        .unwrap();
    admin.update_role_menus(role.id, &[menu.id]).await.unwrap();
    admin.update_user_roles(1, &[role.id]).await.unwrap();
    (ctx, role.id, menu.id)
}

#[tokio::test]
async fn flag_changes_reach_cached_principals() {
    // Arrange: user 2 is a superuser without roles, user 1 a staff role member
    let (ctx, _, _) = context().await;
    let admin = ctx.module.admin();
    let promote = UserFlagsUpdate {
        is_superuser: Some(true),
        ..UserFlagsUpdate::default()
    };
    admin.update_user_flags(1, 2, promote).await.unwrap();
    let superuser = ctx.resolve(2).await;
    let staff = ctx.resolve(1).await;
    assert!(ctx.api().authorize(Some(&superuser), &add_dept()).is_ok());
    assert!(ctx.api().authorize(Some(&staff), &add_dept()).is_ok());

    // Act
    let demote = UserFlagsUpdate {
        is_superuser: Some(false),
        ..UserFlagsUpdate::default()
    };
    admin.update_user_flags(1, 2, demote).await.unwrap();
    let unstaff = UserFlagsUpdate {
        is_staff: Some(false),
        ..UserFlagsUpdate::default()
    };
    admin.update_user_flags(2, 1, unstaff).await.unwrap();

    // Assert
    assert!(!cached(&ctx, 1).await);
    assert!(!cached(&ctx, 2).await);
    let former_superuser = ctx.resolve(2).await;
    assert_eq!(
        ctx.api().authorize(Some(&former_superuser), &add_dept()),
        Err(AccessError::PermissionDenied(DenyReason::NoRole))
    );
    let former_staff = ctx.resolve(1).await;
    assert_eq!(
        ctx.api().authorize(Some(&former_staff), &add_dept()),
        Err(AccessError::PermissionDenied(DenyReason::ManagementForbidden))
    );
}

#[tokio::test]
async fn own_flags_cannot_be_changed() {
    let (ctx, _, _) = context().await;
    ctx.resolve(1).await;

    let err = ctx
        .module
        .admin()
        .update_user_flags(
            1,
            1,
            UserFlagsUpdate {
                is_superuser: Some(true),
                ..UserFlagsUpdate::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        AccessError::from(err),
        AccessError::PermissionDenied(DenyReason::SelfModification)
    );
    assert!(cached(&ctx, 1).await);
    assert!(!ctx.resolve(1).await.is_superuser);
}

#[tokio::test]
async fn menu_code_change_is_seen_after_purge() {
    // Arrange
    let (ctx, _, menu) = context().await;
    let before = ctx.resolve(1).await;
    ctx.resolve(2).await;
    assert!(ctx.api().authorize(Some(&before), &add_dept()).is_ok());

    // Act
    ctx.module
        .admin()
        .update_menu(menu, dept_menu("sys:dept:edit"))
        .await
        .unwrap();

    // Assert
    assert!(!cached(&ctx, 1).await);
    assert!(cached(&ctx, 2).await);
    let after = ctx.resolve(1).await;
    assert_eq!(
        ctx.api().authorize(Some(&after), &add_dept()),
        Err(AccessError::PermissionDenied(DenyReason::PermissionDenied))
    );
}

#[tokio::test]
async fn disabling_a_role_revokes_access() {
    let (ctx, role, _) = context().await;
    ctx.resolve(1).await;

    ctx.module
        .admin()
        .update_role(
            role,
            RoleDraft {
                name: "dept admin".to_owned(),
                status: Status::Disabled,
                filters_scope: true,
                remark: None,
            },
        )
        .await
        .unwrap();

    let principal = ctx.resolve(1).await;
    assert_eq!(
        ctx.api().authorize(Some(&principal), &add_dept()),
        Err(AccessError::PermissionDenied(DenyReason::NoRole))
    );
}

#[tokio::test]
async fn deleting_a_menu_leaves_role_without_menus() {
    let (ctx, _, menu) = context().await;
    ctx.resolve(1).await;

    assert_eq!(ctx.module.admin().delete_menus(&[menu]).await.unwrap(), 1);

    let principal = ctx.resolve(1).await;
    assert_eq!(
        ctx.api().authorize(Some(&principal), &add_dept()),
        Err(AccessError::PermissionDenied(DenyReason::NoMenu))
    );
}

#[tokio::test]
async fn removing_membership_is_seen_by_that_user_only() {
    let (ctx, role, _) = context().await;
    ctx.module.admin().update_user_roles(2, &[role]).await.unwrap();
    ctx.resolve(1).await;
    ctx.resolve(2).await;

    ctx.module.admin().update_user_roles(1, &[]).await.unwrap();

    assert!(!cached(&ctx, 1).await);
    assert!(cached(&ctx, 2).await);
    assert!(ctx.resolve(1).await.roles.is_empty());
}

#[tokio::test]
async fn disabling_a_scope_lifts_its_filter() {
    // Arrange
    let ctx = TestContext::new().await;
    ctx.add_user(1, true).await;
    ctx.add_user(2, true).await;
    let role = ctx
        .scoped_role("hq children", &[("parent_id", Op::And, Ex::Eq, "1")])
        .await;
    ctx.module.admin().update_user_roles(1, &[role]).await.unwrap();
    let before = ctx.resolve(1).await;
    ctx.resolve(2).await;
    assert_ne!(
        ctx.api().compile_filter(&before, "department").await.unwrap(),
        Predicate::True
    );
    let scope = before.roles[0].scopes[0].id;

    // Act
    ctx.module
        .admin()
        .update_scope(
            scope,
            DataScopeDraft {
                name: "hq children scope".to_owned(),
                status: Status::Disabled,
            },
        )
        .await
        .unwrap();

    // Assert
    assert!(!cached(&ctx, 1).await);
    assert!(cached(&ctx, 2).await);
    let after = ctx.resolve(1).await;
    assert_eq!(
        ctx.api().compile_filter(&after, "department").await.unwrap(),
        Predicate::True
    );
}

#[tokio::test]
async fn rule_and_scope_deletion_purge_reachable_users_only() {
    // Arrange: user 1 -> "hq children", user 2 -> "led by 7", user 3 has no roles
    let ctx = TestContext::new().await;
    for id in 1..=3 {
        ctx.add_user(id, false).await;
    }
    let a = ctx
        .scoped_role("hq children", &[("parent_id", Op::And, Ex::Eq, "1")])
        .await;
    let b = ctx
        .scoped_role("led by 7", &[("leader", Op::Or, Ex::Eq, "7")])
        .await;
    ctx.module.admin().update_user_roles(1, &[a]).await.unwrap();
    ctx.module.admin().update_user_roles(2, &[b]).await.unwrap();
    let first = ctx.resolve(1).await;
    ctx.resolve(2).await;
    ctx.resolve(3).await;
    let led_by_7 = data_rule::Entity::find()
        .filter(data_rule::Column::Name.eq("led by 7 rule 0"))
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();

    // Act
    let rules = ctx.module.admin().delete_rules(&[led_by_7.id]).await.unwrap();

    // Assert
    assert_eq!(rules, 1);
    assert!(cached(&ctx, 1).await);
    assert!(!cached(&ctx, 2).await);
    assert!(cached(&ctx, 3).await);

    let scope = first.roles[0].scopes[0].id;
    assert_eq!(ctx.module.admin().delete_scopes(&[scope]).await.unwrap(), 1);
    assert!(!cached(&ctx, 1).await);
    assert!(cached(&ctx, 3).await);
}

#[tokio::test]
async fn excluded_paths_skip_authentication() {
    let ctx = TestContext::new().await;
    ctx.add_user(1, true).await;
    let principal = ctx.resolve(1).await;
    let api = ctx.api();

    let login = AccessRequest::new(Method::POST, "/api/v1/auth/login");
    assert!(api.authorize(None, &login).is_ok());
    let monitor = AccessRequest::new(Method::GET, "/api/v1/monitors/redis");
    assert!(api.authorize(None, &monitor).is_ok());

    assert_eq!(
        api.authorize(None, &add_dept()),
        Err(AccessError::AuthenticationRequired)
    );
    assert_eq!(
        api.authorize(Some(&principal), &add_dept()),
        Err(AccessError::PermissionDenied(DenyReason::NoRole))
    );
}
