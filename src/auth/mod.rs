//! Authentication and session lifecycle
//!
//! - `core`: password hashing and token generation
//! - `credential_store`: identity lookup by email
//! - `storage`: session token stores (Redis, memory)
//! - `session_manager`: login/logout
//! - `guard`: bearer-token access checks
//! - `api`: HTTP endpoints

pub mod api;
pub mod config;
pub mod core;
pub mod credential_store;
pub mod errors;
pub mod guard;
pub mod session_manager;
pub mod storage;
pub mod types;

pub use config::AuthConfig;
pub use credential_store::CredentialStore;
pub use errors::AuthError;
pub use guard::AccessGuard;
pub use session_manager::SessionManager;
pub use storage::{MemorySessionStore, RedisSessionStore, SessionStore};
pub use types::{Identity, IssuedToken, LoginRequest, TokenResponse};
