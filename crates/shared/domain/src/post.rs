//! Post domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_POST_LENGTH;
use crate::validation::not_blank;

/// A short post belonging to exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post creation candidate
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPost {
    #[validate(
        custom(function = "not_blank"),
        length(max = MAX_POST_LENGTH, message = "is too long (maximum is 140 characters)")
    )]
    pub content: String,
}

impl NewPost {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
