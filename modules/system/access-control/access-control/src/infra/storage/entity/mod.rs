//! `SeaORM` entities for the permission graph tables and the filterable
//! business entities registered with the rule engine.

pub mod data_rule;
pub mod data_scope;
pub mod data_scope_rule;
pub mod dept;
pub mod menu;
pub mod role;
pub mod role_data_scope;
pub mod role_menu;
pub mod user;
pub mod user_role;
