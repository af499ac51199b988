//! Cache stores for principal snapshots.

pub mod memory;
pub mod redis;

pub use memory::InMemoryAuthzCache;
pub use redis::RedisAuthzCache;
