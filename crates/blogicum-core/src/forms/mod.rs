//! Input forms: what a client may submit for each entity and how it is validated.
//!
//! Forms only check what can be decided from the submitted values. Checks that
//! need the store (unique usernames, existing categories) are reported by the
//! handlers through the same [`FormErrors`] type.

mod comment;
mod post;
mod profile;
mod registration;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

pub use comment::CommentForm;
pub use post::{INVALID_CHOICE, PostForm, PostInput};
pub use profile::{ProfileForm, ProfileInput};
pub use registration::{MIN_PASSWORD_LENGTH, RegistrationForm, RegistrationInput};

pub(crate) const REQUIRED: &str = "This field is required.";

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single error on one field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Append every message from `other`.
    pub fn merge(&mut self, other: FormErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Replace whatever else was found on `field` when it was left blank.
fn required(errors: &mut FormErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.0.insert(field.to_string(), vec![REQUIRED.to_string()]);
    }
}

/// Run the derived rules of `form`.
fn check<T: Validate>(form: &T) -> FormErrors {
    match form.validate() {
        Ok(()) => FormErrors::new(),
        Err(errors) => errors.into(),
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                form_errors.add(&field, message(failure));
            }
        }
        form_errors
    }
}

fn message(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let length = error
        .params
        .get("value")
        .and_then(|value| value.as_str())
        .map(|value| value.chars().count());
    match (error.code.as_ref(), error.params.get("max"), length) {
        ("length", Some(max), Some(length)) => {
            format!("Ensure this value has at most {max} characters (it has {length}).")
        }
        ("length", Some(max), None) => format!("Ensure this value has at most {max} characters."),
        (code, _, _) => format!("Enter a valid value ({code})."),
    }
}

/// Letters, digits and `@.+-_`.
fn username_chars(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Ok(());
    }
    Err(ValidationError::new("username").with_message(Cow::Borrowed(
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
    )))
}

/// Email is optional; a non-empty value must be an address.
fn optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(Cow::Borrowed("Enter a valid email address.")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
