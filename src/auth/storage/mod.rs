//! Session token storage

pub mod memory;
pub mod redis_store;
pub mod r#trait;

pub use memory::MemorySessionStore;
pub use r#trait::SessionStore;
pub use redis_store::RedisSessionStore;
