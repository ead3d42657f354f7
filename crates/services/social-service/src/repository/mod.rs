//! Repository layer for data access.

pub mod entities;
mod post_repository;
mod relationship_repository;
mod user_repository;

pub use post_repository::{PostRepository, PostStore};
pub use relationship_repository::{RelationshipRepository, RelationshipStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use post_repository::delete_posts_by_author;
pub(crate) use relationship_repository::delete_edges_touching;
pub(crate) use user_repository::{delete_user, find_user};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use post_repository::MockPostRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use relationship_repository::MockRelationshipRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
