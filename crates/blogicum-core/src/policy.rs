//! Authorship policy shared by posts and comments.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Comment, Post};

/// Someone other than the author tried to change a resource.
///
/// Kept apart from [`DomainError`](crate::DomainError): a denial is answered
/// with a redirect back to the resource, never with an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Only the author may change this {0}")]
pub struct NotAuthor(pub &'static str);

/// A resource that belongs to the user who created it.
pub trait Authored {
    /// Human-readable resource name used in errors and logs.
    const KIND: &'static str;

    fn author_id(&self) -> Uuid;
}

impl Authored for Post {
    const KIND: &'static str = "post";

    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Authored for Comment {
    const KIND: &'static str = "comment";

    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Whether `user_id` authored the resource.
pub fn is_author<R: Authored>(resource: &R, user_id: Uuid) -> bool {
    resource.author_id() == user_id
}

/// Only the author may update or delete a resource.
pub fn require_author<R: Authored>(resource: &R, user_id: Uuid) -> Result<(), NotAuthor> {
    if is_author(resource, user_id) {
        Ok(())
    } else {
        Err(NotAuthor(R::KIND))
    }
}
