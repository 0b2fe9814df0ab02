use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{FormErrors, REQUIRED, check, non_empty, required};
use crate::constants::MAX_CHAR_FIELD;
use crate::domain::Post;

pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

const INVALID_DATETIME: &str = "Enter a valid date/time.";

/// Zone-less layouts sent by `datetime-local` inputs; read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Every post field except the author, which always comes from the session.
///
/// Dates and references stay as submitted so that malformed values become
/// field errors instead of a rejected body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(length(max = MAX_CHAR_FIELD))]
    pub title: String,
    pub text: String,
    pub pub_date: Option<String>,
    pub image: Option<String>,
    #[serde(deserialize_with = "checkbox")]
    pub is_published: bool,
    pub location_id: Option<String>,
    pub category_id: Option<String>,
}

impl Default for PostForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            text: String::new(),
            pub_date: None,
            image: None,
            is_published: true,
            location_id: None,
            category_id: None,
        }
    }
}

/// Validated post fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub is_published: bool,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl PostForm {
    /// A blank creation form; the publication date starts at `now`.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            pub_date: Some(now.to_rfc3339()),
            ..Self::default()
        }
    }

    /// The edit form for an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: Some(post.pub_date.to_rfc3339()),
            image: post.image.clone(),
            is_published: post.publication.is_published,
            location_id: post.location_id.map(|id| id.to_string()),
            category_id: post.category_id.map(|id| id.to_string()),
        }
    }

    /// The submitted location, if it is a well-formed id.
    pub fn location(&self) -> Option<Uuid> {
        reference(self.location_id.as_deref()).ok().flatten()
    }

    /// The submitted category, if it is a well-formed id.
    pub fn category(&self) -> Option<Uuid> {
        reference(self.category_id.as_deref()).ok().flatten()
    }

    pub fn clean(self) -> Result<PostInput, FormErrors> {
        let form = Self {
            title: self.title.trim().to_string(),
            ..self
        };
        let mut errors = check(&form);
        required(&mut errors, "title", &form.title);
        required(&mut errors, "text", &form.text);

        let pub_date = match form.pub_date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("pub_date", REQUIRED);
                None
            }
            Some(raw) => {
                let parsed = parse_datetime(raw);
                if parsed.is_none() {
                    errors.add("pub_date", INVALID_DATETIME);
                }
                parsed
            }
        };
        let location_id = choice(&mut errors, "location_id", form.location_id.as_deref());
        let category_id = choice(&mut errors, "category_id", form.category_id.as_deref());

        match pub_date {
            Some(pub_date) if errors.is_empty() => Ok(PostInput {
                title: form.title,
                text: form.text,
                pub_date,
                image: non_empty(form.image),
                is_published: form.is_published,
                location_id,
                category_id,
            }),
            _ => Err(errors),
        }
    }
}

/// RFC 3339, or a zone-less date and time taken as UTC.
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.with_timezone(&Utc));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|value| value.and_utc())
}

/// `Ok(None)` for a blank selection, `Err` for something that is not an id.
fn reference(raw: Option<&str>) -> Result<Option<Uuid>, uuid::Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Uuid::parse_str(raw).map(Some),
    }
}

fn choice(errors: &mut FormErrors, field: &str, raw: Option<&str>) -> Option<Uuid> {
    reference(raw).unwrap_or_else(|_| {
        errors.add(field, INVALID_CHOICE);
        None
    })
}

/// A JSON boolean, or a checkbox value where `on`, `true` and `1` mean checked.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checkbox {
        Flag(bool),
        Text(String),
    }

    Ok(match Checkbox::deserialize(deserializer)? {
        Checkbox::Flag(flag) => flag,
        Checkbox::Text(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1"
        ),
    })
}

impl PostInput {
    /// A new post authored by `author_id`.
    pub fn into_post(self, author_id: Uuid) -> Post {
        let mut post = Post::new(author_id, String::new(), String::new(), self.pub_date);
        self.apply(&mut post);
        post
    }

    /// Overwrite the editable fields of `post`. Author and creation time stay.
    pub fn apply(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.image = self.image;
        post.publication.is_published = self.is_published;
        post.location_id = self.location_id;
        post.category_id = self.category_id;
    }
}
