use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields::{Publication, label};

/// Category entity - a thematic section addressed by its unique slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    #[serde(flatten)]
    pub publication: Publication,
}

impl Category {
    pub fn new(title: String, description: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            slug,
            publication: Publication::new(),
        }
    }

    pub fn is_published(&self) -> bool {
        self.publication.is_published
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(label(&self.title))
    }
}
