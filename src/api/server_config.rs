//! Server configuration constants

use std::time::Duration;

/// Prefix for every route
pub const API_PREFIX: &str = "/api/v1";

/// Concurrent in-flight request limit
pub const MAX_CONCURRENCY: usize = 256;

/// Request body size limit
pub const MAX_BODY_SIZE: usize = 64 * 1024; // 64KB

/// Whole-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// CORS preflight cache lifetime
pub const CORS_MAX_AGE: Duration = Duration::from_secs(3600);
