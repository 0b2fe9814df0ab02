//! Publication rules deciding which posts a viewer may see.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};

/// Whether anyone may see the post: published, not scheduled for the
/// future, and not filed under a hidden category.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.publication.is_published
        && post.pub_date <= now
        && category.is_none_or(Category::is_published)
}

/// Whether `viewer` may open the post by its identifier. Authors always can.
pub fn can_view(
    post: &Post,
    category: Option<&Category>,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> bool {
    viewer == Some(post.author_id) || is_publicly_visible(post, category, now)
}

/// Which posts a listing may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Only publicly visible posts as of `now`.
    Public { now: DateTime<Utc> },
    /// Every post, hidden and scheduled ones included.
    Everything,
}

impl Audience {
    /// Profile owners see all of their posts; everyone else sees the public ones.
    pub fn for_profile(owner: Uuid, viewer: Option<Uuid>, now: DateTime<Utc>) -> Self {
        if viewer == Some(owner) {
            Self::Everything
        } else {
            Self::Public { now }
        }
    }
}

/// Scope and audience of a post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub audience: Audience,
}

impl PostFilter {
    /// The site index: every public post.
    pub fn published(now: DateTime<Utc>) -> Self {
        Self {
            author_id: None,
            category_id: None,
            audience: Audience::Public { now },
        }
    }

    /// Public posts filed under one category.
    pub fn in_category(category_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::published(now)
        }
    }

    /// Posts on a user's profile page as seen by `viewer`.
    pub fn profile(owner: Uuid, viewer: Option<Uuid>, now: DateTime<Utc>) -> Self {
        Self {
            author_id: Some(owner),
            category_id: None,
            audience: Audience::for_profile(owner, viewer, now),
        }
    }

    /// Whether the post belongs in the listing.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.author_id.is_some_and(|id| id != post.author_id) {
            return false;
        }
        if self.category_id.is_some() && self.category_id != post.category_id {
            return false;
        }
        match self.audience {
            Audience::Public { now } => is_publicly_visible(post, category, now),
            Audience::Everything => true,
        }
    }
}
