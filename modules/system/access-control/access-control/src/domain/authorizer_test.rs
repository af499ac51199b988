#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use access_control_sdk::{
    AccessError, AccessRequest, DenyReason, PolicyEngine, Principal, Status,
};
use http::Method;
use tracing_test::traced_test;

use crate::config::AccessControlConfig;
use crate::domain::authorizer::MenuAuthorizer;
use crate::test_support::{menu, principal, role};

struct DenyAll;

impl PolicyEngine for DenyAll {
    fn allows(&self, _principal: &Principal, _resource: &str, _action: &str) -> bool {
        false
    }
}

fn authorizer() -> MenuAuthorizer {
    MenuAuthorizer::new(&AccessControlConfig::default(), None).unwrap()
}

fn staff_with_codes(perms: &str) -> Principal {
    let mut p = principal(1);
    p.is_staff = true;
    p.roles = vec![role(10, vec![menu(100, Some(perms))], vec![])];
    p
}

fn get(path: &str, code: &str) -> AccessRequest {
    AccessRequest::new(Method::GET, path).with_permission(code)
}

#[test]
fn excluded_path_skips_authentication() {
    let authz = authorizer();

    assert!(authz
        .authorize(None, &AccessRequest::new(Method::POST, "/api/v1/auth/login"))
        .is_ok());
    assert!(authz
        .authorize(None, &AccessRequest::new(Method::GET, "/api/v1/monitors/redis"))
        .is_ok());
}

#[test]
fn missing_or_unverified_principal_requires_authentication() {
    let authz = authorizer();
    let request = get("/api/v1/depts", "sys:dept:list");

    assert_eq!(
        authz.authorize(None, &request),
        Err(AccessError::AuthenticationRequired)
    );

    let mut unverified = staff_with_codes("sys:dept:list");
    unverified.auth_scopes.clear();
    assert_eq!(
        authz.authorize(Some(&unverified), &request),
        Err(AccessError::AuthenticationRequired)
    );
}

#[test]
fn superuser_is_always_allowed() {
    let authz = authorizer();
    let mut p = principal(1);
    p.is_superuser = true;

    let request = AccessRequest::new(Method::DELETE, "/api/v1/roles").with_permission("sys:role:del");
    assert!(authz.authorize(Some(&p), &request).is_ok());
}

#[test]
fn no_role_or_all_roles_disabled_is_denied() {
    let authz = authorizer();
    let request = get("/api/v1/depts", "sys:dept:list");

    let p = principal(1);
    assert_eq!(
        authz.authorize(Some(&p), &request),
        Err(AccessError::denied(DenyReason::NoRole))
    );

    let mut p = staff_with_codes("sys:dept:list");
    p.roles[0].status = Status::Disabled;
    assert_eq!(
        authz.authorize(Some(&p), &request),
        Err(AccessError::denied(DenyReason::NoRole))
    );
}

#[test]
fn roles_without_menus_are_denied_even_without_code() {
    let authz = authorizer();
    let mut p = principal(1);
    p.roles = vec![role(10, vec![], vec![])];

    let request = AccessRequest::new(Method::GET, "/api/v1/depts");
    assert_eq!(
        authz.authorize(Some(&p), &request),
        Err(AccessError::denied(DenyReason::NoMenu))
    );
}

#[test]
fn non_staff_may_read_but_not_mutate() {
    let authz = authorizer();
    let mut p = staff_with_codes("sys:dept:list,sys:dept:add");
    p.is_staff = false;

    assert!(authz.authorize(Some(&p), &get("/api/v1/depts", "sys:dept:list")).is_ok());

    let post = AccessRequest::new(Method::POST, "/api/v1/depts").with_permission("sys:dept:add");
    assert_eq!(
        authz.authorize(Some(&p), &post),
        Err(AccessError::denied(DenyReason::ManagementForbidden))
    );
}

#[test]
fn comma_separated_codes_are_split_and_trimmed() {
    let authz = authorizer();
    let p = staff_with_codes("sys:dept:add, sys:dept:edit,,");

    let put = AccessRequest::new(Method::PUT, "/api/v1/depts/1").with_permission("sys:dept:edit");
    assert!(authz.authorize(Some(&p), &put).is_ok());

    assert_eq!(
        authz.authorize(Some(&p), &get("/api/v1/roles", "sys:role:list")),
        Err(AccessError::denied(DenyReason::PermissionDenied))
    );
}

#[test]
fn disabled_menus_and_disabled_roles_grant_nothing() {
    let authz = authorizer();

    let mut p = staff_with_codes("sys:dept:list");
    p.roles[0].menus[0].status = Status::Disabled;
    assert_eq!(
        authz.authorize(Some(&p), &get("/api/v1/depts", "sys:dept:list")),
        Err(AccessError::denied(DenyReason::PermissionDenied))
    );

    let mut p = staff_with_codes("sys:user:list");
    let mut disabled = role(11, vec![menu(101, Some("sys:dept:list"))], vec![]);
    disabled.status = Status::Disabled;
    p.roles.push(disabled);
    assert_eq!(
        authz.authorize(Some(&p), &get("/api/v1/depts", "sys:dept:list")),
        Err(AccessError::denied(DenyReason::PermissionDenied))
    );
}

#[test]
fn excluded_codes_and_missing_code_are_allowed() {
    let authz = authorizer();
    let p = staff_with_codes("sys:dept:list");

    assert!(authz
        .authorize(Some(&p), &get("/api/v1/monitor", "sys:monitor:server"))
        .is_ok());
    assert!(authz
        .authorize(Some(&p), &AccessRequest::new(Method::GET, "/api/v1/depts"))
        .is_ok());
}

#[test]
fn policy_mode_without_engine_is_server_error() {
    let config = AccessControlConfig {
        rbac_role_menu_mode: false,
        ..AccessControlConfig::default()
    };
    let authz = MenuAuthorizer::new(&config, None).unwrap();
    let p = staff_with_codes("sys:dept:list");

    assert!(matches!(
        authz.authorize(Some(&p), &get("/api/v1/depts", "sys:dept:list")),
        Err(AccessError::ServerError(_))
    ));
}

#[test]
fn policy_mode_delegates_to_engine() {
    let config = AccessControlConfig {
        rbac_role_menu_mode: false,
        ..AccessControlConfig::default()
    };
    let p = staff_with_codes("sys:dept:list");
    let request = get("/api/v1/depts", "sys:role:list");

    let deny = MenuAuthorizer::new(&config, Some(Arc::new(DenyAll))).unwrap();
    assert_eq!(
        deny.authorize(Some(&p), &request),
        Err(AccessError::denied(DenyReason::PolicyRejected))
    );

    let allow = MenuAuthorizer::new(
        &config,
        Some(Arc::new(access_control_sdk::NoopPolicyEngine)),
    )
    .unwrap();
    assert!(allow.authorize(Some(&p), &request).is_ok());
}

#[test]
fn invalid_path_pattern_fails_construction() {
    let config = AccessControlConfig {
        token_path_exclude_patterns: vec!["^/api/(".to_owned()],
        ..AccessControlConfig::default()
    };
    assert!(MenuAuthorizer::new(&config, None).is_err());
}

#[test]
#[traced_test]
fn decisions_are_logged() {
    let authz = authorizer();
    let p = staff_with_codes("sys:dept:list");

    let _ = authz.authorize(Some(&p), &get("/api/v1/roles", "sys:role:list"));

    assert!(logs_contain("access denied"));
}
