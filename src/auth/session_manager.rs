//! Session lifecycle: login and logout
//!
//! Token states: absent -> active (login) -> absent (logout or TTL expiry).

use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{
    core::{check_password_length, PasswordService, TokenService},
    credential_store::CredentialStore,
    errors::AuthError,
    storage::SessionStore,
    types::IssuedToken,
};

/// Plaintext hashed once at startup so unknown emails cost one bcrypt verify too
const TIMING_DUMMY_PASSWORD: &str = "socialplace-timing-dummy";

/// Login/logout orchestration over injected store handles
pub struct SessionManager {
    credentials: CredentialStore,
    sessions: Arc<dyn SessionStore>,
    passwords: PasswordService,
    tokens: TokenService,
    dummy_hash: String,
}

impl SessionManager {
    pub fn new(
        credentials: CredentialStore,
        sessions: Arc<dyn SessionStore>,
        passwords: PasswordService,
        tokens: TokenService,
    ) -> Result<Self, AuthError> {
        let dummy_hash = passwords.hash_password(TIMING_DUMMY_PASSWORD)?;
        Ok(Self {
            credentials,
            sessions,
            passwords,
            tokens,
            dummy_hash,
        })
    }

    pub fn token_ttl_secs(&self) -> u64 {
        self.tokens.ttl_secs()
    }

    /// Verify credentials and issue a session token
    ///
    /// Unknown email and wrong password are both `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        if email.is_empty() {
            return Err(AuthError::MalformedRequest("Missing email".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::MalformedRequest("Missing password".to_string()));
        }
        check_password_length(password).map_err(AuthError::MalformedRequest)?;

        let identity = self.credentials.find_by_email(email).await?;

        let (identity, hash) = match identity {
            Some(identity) => {
                let hash = identity.password_hash.clone();
                (Some(identity), hash)
            }
            None => (None, self.dummy_hash.clone()),
        };

        let verified = self
            .passwords
            .verify_password_blocking(password.to_string(), hash)
            .await?;

        let identity = match identity {
            Some(identity) if verified => identity,
            _ => {
                warn!("login rejected: invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.tokens.generate_token();
        let ttl = self.tokens.ttl_secs();
        self.sessions.put(&token, &identity.id, ttl).await?;

        info!(identity_id = %identity.id, ttl_secs = ttl, "session issued");

        Ok(IssuedToken {
            token,
            identity_id: identity.id,
            expires_in: ttl,
        })
    }

    /// Revoke a live session token
    pub async fn logout(&self, token: Option<&str>) -> Result<(), AuthError> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AuthError::MissingToken),
        };

        let identity_id = self
            .sessions
            .resolve(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        self.sessions.revoke(token).await?;

        info!(identity_id = %identity_id, "session revoked");
        Ok(())
    }
}
