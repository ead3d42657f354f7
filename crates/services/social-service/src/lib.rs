//! Social Service Library
//!
//! Users, their posts, the follow graph between them, and the feed that
//! graph produces. Everything is exposed as an in-process async API.
//!
//! # Layers
//!
//! - **config**: environment-driven settings
//! - **infra**: database connection, schema and the Unit of Work
//! - **repository**: sea-orm entities and stores
//! - **service**: use cases (`UserService`, `PostService`,
//!   `RelationshipService`, `FeedService`) and the service container
//!
//! # Usage
//!
//! ```ignore
//! let services = social_service::bootstrap(&SocialServiceConfig::from_env()).await?;
//! let feed = services.feeds().feed(user_id).await?;
//! let page = feed.first_page().await?;
//! ```

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use common::AppResult;

pub use crate::config::SocialServiceConfig;
pub use crate::infra::Database;
pub use crate::service::{ServiceContainer, Services};

/// Connect to the configured database, bring the schema up to date and
/// wire every service.
pub async fn bootstrap(config: &SocialServiceConfig) -> AppResult<Services> {
    let db = Database::connect(&config.database).await?;
    tracing::info!(self_follow = ?config.self_follow, "Social service ready");
    Ok(Services::from_connection(db.get_connection(), config))
}
