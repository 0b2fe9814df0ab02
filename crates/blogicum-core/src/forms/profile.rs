use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FormErrors, check, optional_email, required, username_chars};
use crate::constants::MAX_NAME_FIELD;
use crate::domain::User;

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileForm {
    #[validate(length(max = MAX_NAME_FIELD), custom(function = "username_chars"))]
    pub username: String,
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    #[validate(length(max = MAX_NAME_FIELD))]
    pub first_name: String,
    #[validate(length(max = MAX_NAME_FIELD))]
    pub last_name: String,
}

/// Validated profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInput {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }

    pub fn clean(self) -> Result<ProfileInput, FormErrors> {
        let form = Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        };
        let mut errors = check(&form);
        required(&mut errors, "username", &form.username);
        errors.into_result(ProfileInput {
            username: form.username,
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
        })
    }
}

impl ProfileInput {
    pub fn apply(self, user: &mut User) {
        user.username = self.username;
        user.email = self.email;
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_applies_fields() {
        let mut user = User::new("anna".into(), String::new(), "hash".into());
        let form = ProfileForm {
            username: "anna.k".into(),
            first_name: "Anna".into(),
            last_name: "Karenina".into(),
            ..ProfileForm::from_user(&user)
        };

        form.clean().unwrap().apply(&mut user);

        assert_eq!(user.username, "anna.k");
        assert_eq!(user.last_name, "Karenina");
        assert_eq!(user.password_hash, "hash");
    }

    #[test]
    fn test_profile_rejects_bad_values() {
        let form = ProfileForm {
            username: String::new(),
            email: "nope".into(),
            first_name: "x".repeat(MAX_NAME_FIELD as usize + 1),
            last_name: String::new(),
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(errors.get("username"), ["This field is required."]);
        assert_eq!(errors.get("email"), ["Enter a valid email address."]);
        assert!(errors.has("first_name"));
        assert!(!errors.has("last_name"));
    }

    #[test]
    fn test_profile_trims_before_checking() {
        let form = ProfileForm {
            username: "  anna  ".into(),
            email: " anna@example.com ".into(),
            ..ProfileForm::default()
        };
        let input = form.clean().unwrap();
        assert_eq!(input.username, "anna");
        assert_eq!(input.email, "anna@example.com");

        let errors = ProfileForm {
            username: "an na".into(),
            ..ProfileForm::default()
        }
        .clean()
        .unwrap_err();
        assert!(errors.get("username")[0].starts_with("Enter a valid username."));
    }
}
