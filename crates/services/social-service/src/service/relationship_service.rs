//! Relationship service - the follow graph as seen by callers.
//!
//! Wraps the relationship store with existence checks on both endpoints and
//! the configured self-follow policy. `follow` and `unfollow` are idempotent.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Relationship, SelfFollowPolicy};

use crate::repository::{RelationshipRepository, UserRepository};

/// Relationship service trait for dependency injection.
#[async_trait]
pub trait RelationshipService: Send + Sync {
    /// Make `follower_id` follow `followed_id`; returns whether an edge was created
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool>;

    /// Drop the edge if present; returns whether an edge was removed
    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool>;

    /// Whether `follower_id` currently follows `followed_id`
    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool>;

    /// The edge itself, with its creation time
    async fn relationship(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<Relationship>;

    /// Users following `user_id`
    async fn followers(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>>;

    /// Users `user_id` follows
    async fn following(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>>;

    async fn follower_count(&self, user_id: Uuid) -> AppResult<u64>;

    async fn following_count(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of RelationshipService using repositories.
pub struct RelationshipManager {
    users: Arc<dyn UserRepository>,
    relationships: Arc<dyn RelationshipRepository>,
    policy: SelfFollowPolicy,
}

impl RelationshipManager {
    /// Create new relationship service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        relationships: Arc<dyn RelationshipRepository>,
        policy: SelfFollowPolicy,
    ) -> Self {
        Self {
            users,
            relationships,
            policy,
        }
    }

    async fn ensure_users(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<()> {
        let (follower, followed) = tokio::try_join!(
            self.users.exists(follower_id),
            self.users.exists(followed_id)
        )?;

        if follower && followed {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}

#[async_trait]
impl RelationshipService for RelationshipManager {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool> {
        if let Err(e) = self.policy.check(follower_id, followed_id) {
            tracing::warn!(user_id = %follower_id, "Rejected self-follow");
            return Err(e.into());
        }
        self.ensure_users(follower_id, followed_id).await?;

        let created = self.relationships.follow(follower_id, followed_id).await?;
        if created {
            tracing::info!(follower = %follower_id, followed = %followed_id, "Follow created");
        } else {
            tracing::debug!(follower = %follower_id, followed = %followed_id, "Already following");
        }
        Ok(created)
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool> {
        self.ensure_users(follower_id, followed_id).await?;

        let removed = self.relationships.unfollow(follower_id, followed_id).await?;
        if removed {
            tracing::info!(follower = %follower_id, followed = %followed_id, "Follow removed");
        }
        Ok(removed)
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool> {
        self.relationships.is_following(follower_id, followed_id).await
    }

    async fn relationship(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<Relationship> {
        self.relationships
            .find(follower_id, followed_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn followers(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>> {
        self.relationships.followers(user_id).await
    }

    async fn following(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>> {
        self.relationships.following(user_id).await
    }

    async fn follower_count(&self, user_id: Uuid) -> AppResult<u64> {
        self.relationships.follower_count(user_id).await
    }

    async fn following_count(&self, user_id: Uuid) -> AppResult<u64> {
        self.relationships.following_count(user_id).await
    }
}
