use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields::{Publication, label};

/// Location entity - where a post was written. Managed from the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub publication: Publication,
}

impl Location {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            publication: Publication::new(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(label(&self.name))
    }
}
