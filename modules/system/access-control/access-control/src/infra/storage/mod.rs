//! Storage layer: `SeaORM` entities, migrations and the query-side bindings
//! of the rule engine.
//!
//! - `entity/` - permission graph tables and filterable business tables
//! - `schema` - builds the entity registry from column metadata
//! - `filter` - binds compiled predicates to `SeaORM` conditions
//! - `graph` - reverse walks used for cache invalidation
//! - `sea_orm_repo` - the `AccessRepository` implementation

pub mod entity;
pub mod filter;
pub mod graph;
pub mod mapper;
pub mod migrations;
pub mod schema;
pub mod sea_orm_repo;

#[cfg(test)]
mod filter_test;

pub use sea_orm_repo::SeaOrmAccessRepository;
