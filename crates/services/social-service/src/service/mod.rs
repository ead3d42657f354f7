//! Service layer - business logic over the repositories.

pub mod container;
mod feed_service;
mod post_service;
mod relationship_service;
mod user_service;

pub use container::{ServiceContainer, Services};
pub use feed_service::{Feed, FeedComposer, FeedService};
pub use post_service::{PostManager, PostService};
pub use relationship_service::{RelationshipManager, RelationshipService};
pub use user_service::{DestroyedUser, UserManager, UserService};
