//! Domain layer - users, posts and follow relationships.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! entities, validation rules and the password value object.

pub mod constants;
pub mod error;
pub mod pagination;
pub mod password;
pub mod post;
pub mod relationship;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use password::Password;
pub use post::{NewPost, Post};
pub use relationship::{Relationship, SelfFollowPolicy};
pub use user::{normalize_email, NewUser, User};
pub use validation::{validate_post, validate_user, FieldError};
