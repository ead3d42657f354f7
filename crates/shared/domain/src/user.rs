//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::password::Password;
use crate::validation::{not_blank, well_formed_email};

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 digest of the password; `None` for users that never set one
    #[serde(skip_serializing)]
    pub password_digest: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record
    pub fn new(id: Uuid, name: String, email: String, password_digest: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            password_digest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check a plain text password against the stored digest.
    ///
    /// A user without a digest never authenticates, whatever the input.
    pub fn authenticated(&self, plain_text: &str) -> bool {
        match &self.password_digest {
            Some(digest) => Password::from_hash(digest.clone()).verify(plain_text),
            None => false,
        }
    }

    /// Whether this user has a password digest at all
    pub fn has_password(&self) -> bool {
        self.password_digest.is_some()
    }
}

/// User creation candidate, validated before it reaches storage.
#[derive(Clone, Deserialize, Validate)]
pub struct NewUser {
    /// Display name
    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_NAME_LENGTH, message = "is too long (maximum is 50 characters)")
    )]
    pub name: String,
    /// Email address (compared case-insensitively)
    #[validate(
        custom(function = "well_formed_email"),
        length(max = MAX_EMAIL_LENGTH, message = "is too long (maximum is 255 characters)")
    )]
    pub email: String,
    /// Plain text password (never stored)
    #[validate(length(
        min = MIN_PASSWORD_LENGTH,
        message = "is too short (minimum is 6 characters)"
    ))]
    pub password: Option<String>,
    /// Must equal `password` when present
    pub password_confirmation: Option<String>,
}

impl NewUser {
    /// Candidate without a password
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: None,
            password_confirmation: None,
        }
    }

    /// Attach a password and its confirmation
    pub fn with_password(
        mut self,
        password: impl Into<String>,
        confirmation: impl Into<String>,
    ) -> Self {
        self.password = Some(password.into());
        self.password_confirmation = Some(confirmation.into());
        self
    }

    /// Email as it is persisted: trimmed and lowercased
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

// Don't expose plain text passwords in debug output
impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
