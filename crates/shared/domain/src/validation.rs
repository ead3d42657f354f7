//! Field validators for user and post candidates.
//!
//! Validation runs as an explicit step before persistence. Every rule failure
//! is reported, so a caller can show all problems with a form at once.

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::EMAIL_PATTERN;
use crate::post::NewPost;
use crate::user::NewUser;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// Machine-readable rule code (`blank`, `length`, `format`, ...)
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Validate a user candidate, returning every rule it breaks.
///
/// An empty vector means the candidate may be persisted.
pub fn validate_user(candidate: &NewUser) -> Vec<FieldError> {
    let mut errors = flatten(candidate.validate());

    if let Some(password) = candidate.password.as_deref() {
        if password.trim().is_empty() {
            errors.push(FieldError::new("password", "blank", "can't be blank"));
        }
        if let Some(confirmation) = candidate.password_confirmation.as_deref() {
            if confirmation != password {
                errors.push(FieldError::new(
                    "password_confirmation",
                    "confirmation",
                    "doesn't match password",
                ));
            }
        }
    }

    errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    errors
}

/// Validate a post candidate, returning every rule it breaks.
pub fn validate_post(candidate: &NewPost) -> Vec<FieldError> {
    flatten(candidate.validate())
}

/// Reject empty or whitespace-only values.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("blank", "can't be blank"));
    }
    Ok(())
}

/// Reject blank values and values that do not look like `local@domain.tld`.
pub(crate) fn well_formed_email(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !EMAIL_REGEX.is_match(value) {
        return Err(rule("format", "is invalid"));
    }
    Ok(())
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn flatten(result: Result<(), ValidationErrors>) -> Vec<FieldError> {
    let Err(errors) = result else {
        return Vec::new();
    };

    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                FieldError::new(field.to_string(), e.code.to_string(), message)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_POST_LENGTH, MIN_PASSWORD_LENGTH,
    };

    fn text(len: u64) -> String {
        "a".repeat(len as usize)
    }

    fn example_user() -> NewUser {
        NewUser::new("Example User", "user@example.com").with_password("geasss", "geasss")
    }

    fn has_error(errors: &[FieldError], field: &str) -> bool {
        errors.iter().any(|e| e.field == field)
    }

    #[test]
    fn test_example_user_is_valid() {
        assert!(validate_user(&example_user()).is_empty());
    }

    #[test]
    fn test_name_must_be_present() {
        let mut user = example_user();
        user.name = "   ".to_string();
        assert!(has_error(&validate_user(&user), "name"));
    }

    #[test]
    fn test_email_must_be_present() {
        let mut user = example_user();
        user.email = "   ".to_string();
        let errors = validate_user(&user);
        assert!(errors.iter().any(|e| e.field == "email" && e.code == "blank"));
    }

    #[test]
    fn test_name_must_not_be_too_long() {
        let mut user = example_user();
        user.name = text(MAX_NAME_LENGTH + 1);
        assert!(has_error(&validate_user(&user), "name"));

        user.name = text(MAX_NAME_LENGTH);
        assert!(validate_user(&user).is_empty());
    }

    #[test]
    fn test_email_must_not_be_too_long() {
        let mut user = example_user();
        let domain = "@example.com";
        user.email = format!("{}{domain}", text(MAX_EMAIL_LENGTH + 1 - domain.len() as u64));
        assert!(has_error(&validate_user(&user), "email"));

        user.email = format!("{}{domain}", text(MAX_EMAIL_LENGTH - domain.len() as u64));
        assert!(validate_user(&user).is_empty());
    }

    #[test]
    fn test_accepts_valid_addresses() {
        let valid = [
            "user@example.com",
            "USER@foo.COM",
            "A_US-ER@foo.bar.org",
            "first.last@foo.jp",
            "alice+bob@baz.cn",
        ];
        for address in valid {
            let mut user = example_user();
            user.email = address.to_string();
            assert!(
                validate_user(&user).is_empty(),
                "{address:?} should be valid"
            );
        }
    }

    #[test]
    fn test_rejects_invalid_addresses() {
        let invalid = [
            "user@example,com",
            "USER_at_foo.org",
            "user.name@example.",
            "foo@bar_baz.com",
            "foo@bar+baz.com",
        ];
        for address in invalid {
            let mut user = example_user();
            user.email = address.to_string();
            assert!(
                has_error(&validate_user(&user), "email"),
                "{address:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_password_minimum_length() {
        let user = NewUser::new("Example User", "user@example.com").with_password("aaaaa", "aaaaa");
        let errors = validate_user(&user);
        assert!(errors
            .iter()
            .any(|e| e.field == "password" && e.code == "length"));

        let user = NewUser::new("Example User", "user@example.com")
            .with_password(text(MIN_PASSWORD_LENGTH), text(MIN_PASSWORD_LENGTH));
        assert!(validate_user(&user).is_empty());
    }

    #[test]
    fn test_password_must_not_be_blank() {
        let user =
            NewUser::new("Example User", "user@example.com").with_password("      ", "      ");
        let errors = validate_user(&user);
        assert!(errors.iter().any(|e| e.field == "password" && e.code == "blank"));
    }

    #[test]
    fn test_password_confirmation_must_match() {
        let user = NewUser::new("Example User", "user@example.com").with_password("geasss", "other1");
        assert!(has_error(&validate_user(&user), "password_confirmation"));
    }

    #[test]
    fn test_password_is_optional() {
        let user = NewUser::new("Example User", "user@example.com");
        assert!(validate_user(&user).is_empty());
    }

    #[test]
    fn test_post_content_rules() {
        assert!(validate_post(&NewPost::new("Spartaaaaaaa")).is_empty());
        assert!(!validate_post(&NewPost::new("  ")).is_empty());
        assert!(validate_post(&NewPost::new(text(MAX_POST_LENGTH))).is_empty());
        assert!(!validate_post(&NewPost::new(text(MAX_POST_LENGTH + 1))).is_empty());
    }
}
