//! Domain layer: authorization decisions, filter compilation and the
//! administrative mutations that keep cached principals coherent.
//!
//! - `authorizer` - menu/permission-code checks for one request
//! - `compiler` - data scopes to row-filter predicate
//! - `principal` - cache-first principal hydration
//! - `invalidation` - post-commit purge of cached principals
//! - `service` - transactional admin operations
//!
//! The domain reads storage only through the `AccessRepository` and
//! `AuthzCache` ports, except `service`, which owns its transactions.

pub mod authorizer;
pub mod compiler;
pub mod error;
pub mod invalidation;
pub mod ports;
pub mod principal;
pub mod registry;
pub mod repo;
pub mod service;

#[cfg(test)]
mod authorizer_test;
