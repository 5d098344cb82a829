//! Session token policy

use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per token (256 bits)
pub const TOKEN_BYTES: usize = 32;

/// Mints opaque session tokens and owns their lifetime
#[derive(Debug, Clone)]
pub struct TokenService {
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(ttl_secs: u64) -> Self {
        Self { ttl_secs }
    }

    /// Token lifetime (seconds)
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Generate a fresh token from the OS CSPRNG, hex encoded
    pub fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}
