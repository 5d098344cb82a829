//! Authentication policy configuration

use serde::{Deserialize, Serialize};

use crate::config::env_or;

/// Default session lifetime: 24 hours
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Longest accepted session lifetime: one year
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 86_400;

/// Authentication policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token lifetime (seconds)
    pub token_ttl_secs: u64,

    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            token_ttl_secs: env_or("SOCIALPLACE_TOKEN_TTL", DEFAULT_TOKEN_TTL_SECS)?,
            bcrypt_cost: env_or("SOCIALPLACE_BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.token_ttl_secs == 0 {
            return Err("token TTL must be at least one second".to_string());
        }
        if self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(format!(
                "token TTL {}s exceeds the maximum of {}s",
                self.token_ttl_secs, MAX_TOKEN_TTL_SECS
            ));
        }
        // bcrypt only accepts 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(format!("bcrypt cost {} outside 4..=31", self.bcrypt_cost));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl_secs, 86_400);
        assert_eq!(config.bcrypt_cost, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_ttl = AuthConfig { token_ttl_secs: 0, ..AuthConfig::default() };
        assert!(zero_ttl.validate().is_err());

        let year = AuthConfig { token_ttl_secs: MAX_TOKEN_TTL_SECS, ..AuthConfig::default() };
        assert!(year.validate().is_ok());

        let huge_ttl = AuthConfig { token_ttl_secs: MAX_TOKEN_TTL_SECS + 1, ..AuthConfig::default() };
        assert!(huge_ttl.validate().is_err());

        let overflow_ttl = AuthConfig { token_ttl_secs: u64::MAX, ..AuthConfig::default() };
        assert!(overflow_ttl.validate().is_err());

        let low_cost = AuthConfig { bcrypt_cost: 3, ..AuthConfig::default() };
        assert!(low_cost.validate().is_err());

        let high_cost = AuthConfig { bcrypt_cost: 32, ..AuthConfig::default() };
        assert!(high_cost.validate().is_err());
    }
}
