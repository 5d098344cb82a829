//! Stored records
//!
//! Each record maps one-to-one to a document in its collection; field names
//! follow the stored document shape (`_id`, camelCase).

pub mod community;
pub mod post;
pub mod user;

pub use community::{Community, NewCommunityRequest};
pub use post::{NewPostRequest, Post};
pub use user::{NewUserRequest, User, UserUpdate, UserView};

/// Minimal email shape check used on writes
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a x@x.com"));
        assert!(!is_valid_email(""));
    }
}
