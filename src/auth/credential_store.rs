//! Credential lookup over the document store

use crate::auth::types::Identity;
use crate::models::User;
use crate::storage::{Documents, StoreError};

/// Read-only view of stored identities
#[derive(Clone)]
pub struct CredentialStore {
    documents: Documents,
}

impl CredentialStore {
    pub fn new(documents: Documents) -> Self {
        Self { documents }
    }

    /// Exact, case-sensitive match on `email`. Outages surface as errors, never as `None`.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let user: Option<User> = self.documents.find_by_email(email).await?;
        Ok(user.map(Identity::from))
    }
}
