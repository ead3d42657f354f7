//! Service Container - centralized access to every social service.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    FeedComposer, FeedService, PostManager, PostService, RelationshipManager,
    RelationshipService, UserManager, UserService,
};
use crate::config::SocialServiceConfig;
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Registration, authentication and account removal
    fn users(&self) -> Arc<dyn UserService>;

    /// Publishing and reading posts
    fn posts(&self) -> Arc<dyn PostService>;

    /// The follow graph
    fn relationships(&self) -> Arc<dyn RelationshipService>;

    /// Feed composition
    fn feeds(&self) -> Arc<dyn FeedService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
    post_service: Arc<dyn PostService>,
    relationship_service: Arc<dyn RelationshipService>,
    feed_service: Arc<dyn FeedService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: DatabaseConnection, config: &SocialServiceConfig) -> Self {
        let uow = Arc::new(Persistence::new(db));

        let post_service = Arc::new(PostManager::new(uow.users(), uow.posts()));
        let relationship_service = Arc::new(RelationshipManager::new(
            uow.users(),
            uow.relationships(),
            config.self_follow,
        ));
        let feed_service = Arc::new(FeedComposer::new(
            uow.users(),
            uow.relationships(),
            uow.posts(),
            config.feed_page_size,
        ));
        let user_service = Arc::new(UserManager::new(uow));

        Self {
            user_service,
            post_service,
            relationship_service,
            feed_service,
        }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn posts(&self) -> Arc<dyn PostService> {
        self.post_service.clone()
    }

    fn relationships(&self) -> Arc<dyn RelationshipService> {
        self.relationship_service.clone()
    }

    fn feeds(&self) -> Arc<dyn FeedService> {
        self.feed_service.clone()
    }
}
