use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FormErrors, check, required};
use crate::constants::MAX_CHAR_FIELD;
use crate::domain::Comment;

/// The only field a commenter controls. Post and author are injected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(max = MAX_CHAR_FIELD))]
    pub text: String,
}

impl CommentForm {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
        }
    }

    /// The validated comment text.
    pub fn clean(self) -> Result<String, FormErrors> {
        let mut errors = check(&self);
        required(&mut errors, "text", &self.text);
        errors.into_result(self.text)
    }
}
