//! Field groups embedded by value in several entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::LABEL_LENGTH;

/// Publication flag plus creation time, shared by locations, categories and posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Publication {
    /// A published record created now.
    pub fn new() -> Self {
        Self {
            is_published: true,
            created_at: Utc::now(),
        }
    }

    /// A hidden record created now.
    pub fn hidden() -> Self {
        Self {
            is_published: false,
            ..Self::new()
        }
    }
}

impl Default for Publication {
    fn default() -> Self {
        Self::new()
    }
}

/// Creation time only, used by comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creation {
    pub created_at: DateTime<Utc>,
}

impl Creation {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
        }
    }
}

impl Default for Creation {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut a display string to [`LABEL_LENGTH`] characters.
pub(crate) fn label(value: &str) -> &str {
    match value.char_indices().nth(LABEL_LENGTH) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
