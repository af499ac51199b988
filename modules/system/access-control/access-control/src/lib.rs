//! Access Control Module
//!
//! Menu authorization and row-level data permissions for admin back ends.
//!
//! ## Public API
//!
//! The public API is defined in the `access-control-sdk` crate and re-exported here:
//! - `AccessControlApi` - `authorize` and `compile_filter`
//! - `Principal`, `AccessRequest`, `Predicate` - data models
//! - `AccessError`, `DenyReason` - error types
//!
//! Build an [`AccessControlModule`] once at startup, resolve principals with
//! [`AccessControlModule::principals`], gate requests through
//! [`AccessControlModule::api`], and bind compiled predicates to queries with
//! [`infra::storage::filter::filter_select`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use access_control_sdk::{
    AccessControlApi, AccessError, AccessRequest, DenyReason, Predicate, Principal,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::AccessControlModule;

// === LOCAL CLIENT ===
pub mod local_client;

// === INTERNAL MODULES ===
// Exposed for integration tests and advanced wiring; prefer the SDK types.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

#[cfg(test)]
mod test_support;
