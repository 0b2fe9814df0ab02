use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FormErrors, check, optional_email, required, username_chars};
use crate::constants::MAX_NAME_FIELD;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegistrationForm {
    #[validate(length(max = MAX_NAME_FIELD), custom(function = "username_chars"))]
    pub username: String,
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    #[validate(length(
        min = MIN_PASSWORD_LENGTH,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password: String,
    #[validate(must_match(other = "password", message = "The two password fields didn't match."))]
    pub password_confirmation: String,
}

/// Validated sign-up data; the password is still plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn clean(self) -> Result<RegistrationInput, FormErrors> {
        let form = Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self
        };
        let mut errors = check(&form);
        required(&mut errors, "username", &form.username);
        if form.password.is_empty() {
            required(&mut errors, "password", &form.password);
        }

        errors.into_result(RegistrationInput {
            username: form.username,
            email: form.email,
            password: form.password,
        })
    }
}
