//! Post record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    /// Author; always the authenticated identity at creation
    pub user_id: String,
    pub community_id: String,
    pub content: String,
    /// Set for replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl Document for Post {
    const COLLECTION: &'static str = "posts";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Post {
    pub fn new(author_id: &str, req: NewPostRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: author_id.to_string(),
            community_id: req.community_id,
            content: req.content,
            parent_id: req.parent_id,
            date_created: now,
            date_updated: now,
        }
    }
}

/// Post creation request; the author comes from the session, not the body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPostRequest {
    pub community_id: String,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl NewPostRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.community_id.is_empty() {
            return Err("Missing communityId".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("Missing content".to_string());
        }
        Ok(())
    }
}
