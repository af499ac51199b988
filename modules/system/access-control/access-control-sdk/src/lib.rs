//! Access Control SDK
//!
//! This crate provides the public API for the `access-control` module:
//!
//! - [`AccessControlApi`] - Public API trait for consumers (menu authorization + row filtering)
//! - [`PolicyEngine`] - External policy engine consulted when menu-code mode is disabled
//! - [`Principal`], [`AccessRequest`] - Inputs of an authorization decision
//! - [`Predicate`] - Transport-agnostic row filter produced by the compiler
//! - [`AccessError`], [`DenyReason`] - Error taxonomy
//!
//! ## Usage
//!
//! ```ignore
//! use access_control_sdk::{AccessControlApi, AccessRequest};
//!
//! let request = AccessRequest::new(http::Method::GET, "/api/v1/depts")
//!     .with_permission("sys:dept:list");
//! api.authorize(Some(&principal), &request)?;
//!
//! let filter = api.compile_filter(&principal, "department").await?;
//! ```

pub mod api;
pub mod errors;
pub mod models;
pub mod policy;
pub mod predicate;

pub use api::AccessControlApi;
pub use errors::{AccessError, DenyReason};
pub use models::{
    AccessRequest, DataRule, DataRuleDraft, DataScope, DataScopeDraft, Menu, MenuDraft, MenuType,
    Principal, PrincipalMenu, PrincipalRole, PrincipalScope, Role, RoleDraft, RuleColumn,
    RuleExpression, RuleOperator, Status, UserFlagsUpdate,
};
pub use policy::{NoopPolicyEngine, PolicyEngine, PolicyEngineRef};
pub use predicate::{CompareOp, FieldKind, FilterValue, Predicate};
