//! User record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::core::check_password_length;
use crate::storage::Document;

/// Stored user document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    /// bcrypt hash, never the plaintext
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Community ids the user belongs to
    #[serde(default)]
    pub communities: Vec<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    /// Build a new user from a registration request and an already-hashed password
    pub fn new(req: NewUserRequest, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email: req.email,
            password_hash,
            username: req.username.unwrap_or_default(),
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            communities: Vec::new(),
            date_created: now,
            date_updated: now,
        }
    }

    /// Apply a validated update. `password_hash` replaces the stored hash when set.
    pub fn apply_update(&mut self, update: UserUpdate, password_hash: Option<String>) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        self.date_updated = Utc::now();
    }

    /// Record community membership; returns false if already present
    pub fn join_community(&mut self, community_id: &str) -> bool {
        if self.communities.iter().any(|id| id == community_id) {
            return false;
        }
        self.communities.push(community_id.to_string());
        self.date_updated = Utc::now();
        true
    }
}

/// Public view of a user (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub communities: Vec<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            communities: user.communities.clone(),
            date_created: user.date_created,
            date_updated: user.date_updated,
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl NewUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.email.is_empty() {
            return Err("Missing email".to_string());
        }
        if !super::is_valid_email(&self.email) {
            return Err("Invalid email".to_string());
        }
        if self.password.is_empty() {
            return Err("Missing password".to_string());
        }
        check_password_length(&self.password)?;
        Ok(())
    }
}

/// Allow-listed user update. Anything else in the body (`_id`,
/// `dateCreated`, `dateUpdated`, `communities`, ...) is rejected at parse time.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.email.is_none()
            && self.password.is_none()
            && self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
        {
            return Err("No updatable fields supplied".to_string());
        }
        if let Some(email) = &self.email {
            if email.is_empty() {
                return Err("Missing email".to_string());
            }
            if !super::is_valid_email(email) {
                return Err("Invalid email".to_string());
            }
        }
        if let Some(password) = &self.password {
            if password.is_empty() {
                return Err("Missing password".to_string());
            }
            check_password_length(password)?;
        }
        Ok(())
    }
}
