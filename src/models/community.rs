//! Community record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Member user ids, creator first
    #[serde(default)]
    pub members: Vec<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl Document for Community {
    const COLLECTION: &'static str = "communities";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Community {
    pub fn new(name: String, creator_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            members: vec![creator_id.to_string()],
            date_created: now,
            date_updated: now,
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|id| id == user_id)
    }

    /// Returns false if already a member
    pub fn add_member(&mut self, user_id: &str) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.members.push(user_id.to_string());
        self.date_updated = Utc::now();
        true
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCommunityRequest {
    pub name: String,
}

impl NewCommunityRequest {
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Missing name".to_string());
        }
        if name.chars().count() > 64 {
            return Err("Name must be at most 64 characters".to_string());
        }
        Ok(())
    }
}
