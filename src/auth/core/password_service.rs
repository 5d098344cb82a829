//! Password hashing service (bcrypt)

use crate::auth::errors::AuthError;
use tracing::warn;

/// bcrypt only reads this many bytes of input; longer passwords are refused
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Length check shared by registration, update and login
pub fn check_password_length(password: &str) -> Result<(), String> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES));
    }
    Ok(())
}

/// Password hasher
///
/// bcrypt embeds a random salt and the cost in every hash, so repeated
/// hashing of the same plaintext yields different strings that all verify.
/// Verification compares digests in constant time.
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        check_password_length(password).map_err(AuthError::MalformedRequest)?;
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::InternalError(format!("password hashing failed: {}", e)))
    }

    /// Verify a plaintext against a stored hash. Malformed hashes fail closed.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        // bcrypt would compare only the prefix
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match bcrypt::verify(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("stored password hash rejected: {}", e);
                false
            }
        }
    }

    /// `hash_password` on the blocking pool
    pub async fn hash_password_blocking(&self, password: String) -> Result<String, AuthError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash_password(&password))
            .await
            .map_err(|e| AuthError::InternalError(format!("hashing task failed: {}", e)))?
    }

    /// `verify_password` on the blocking pool
    pub async fn verify_password_blocking(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::InternalError(format!("verification task failed: {}", e)))
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
