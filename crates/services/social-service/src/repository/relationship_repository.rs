//! Relationship store - the follow graph.
//!
//! Queries are written once against [`ConnectionTrait`] so the pooled store
//! and the transaction-bound repository share them.

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::sea_query::{Condition, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::relationship::{self, ActiveModel, Entity as RelationshipEntity};
use common::AppResult;
use domain::Relationship;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Relationship repository trait for dependency injection.
///
/// Set-valued queries carry no ordering guarantee.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Create the edge if absent; returns whether a new edge was inserted
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool>;

    /// Remove the edge if present; returns whether an edge was removed
    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool>;

    /// Membership test
    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool>;

    /// Fetch a single edge
    async fn find(&self, follower_id: Uuid, followed_id: Uuid)
        -> AppResult<Option<Relationship>>;

    /// All users following `user_id`
    async fn followers(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>>;

    /// All users `user_id` follows
    async fn following(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>>;

    /// Number of users following `user_id`
    async fn follower_count(&self, user_id: Uuid) -> AppResult<u64>;

    /// Number of users `user_id` follows
    async fn following_count(&self, user_id: Uuid) -> AppResult<u64>;

    /// Remove every edge touching `user_id`; returns the number removed
    async fn remove_all_edges_for(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of RelationshipRepository
pub struct RelationshipStore {
    db: DatabaseConnection,
}

impl RelationshipStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RelationshipRepository for RelationshipStore {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool> {
        insert_edge(&self.db, follower_id, followed_id).await
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool> {
        delete_edge(&self.db, follower_id, followed_id).await
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> AppResult<bool> {
        Ok(find_edge(&self.db, follower_id, followed_id).await?.is_some())
    }

    async fn find(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> AppResult<Option<Relationship>> {
        find_edge(&self.db, follower_id, followed_id).await
    }

    async fn followers(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>> {
        let ids: Vec<Uuid> = RelationshipEntity::find()
            .select_only()
            .column(relationship::Column::FollowerId)
            .filter(relationship::Column::FollowedId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(ids.into_iter().collect())
    }

    async fn following(&self, user_id: Uuid) -> AppResult<HashSet<Uuid>> {
        following_ids(&self.db, user_id).await
    }

    async fn follower_count(&self, user_id: Uuid) -> AppResult<u64> {
        let count = RelationshipEntity::find()
            .filter(relationship::Column::FollowedId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn following_count(&self, user_id: Uuid) -> AppResult<u64> {
        let count = RelationshipEntity::find()
            .filter(relationship::Column::FollowerId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn remove_all_edges_for(&self, user_id: Uuid) -> AppResult<u64> {
        delete_edges_touching(&self.db, user_id).await
    }
}

// =============================================================================
// Shared queries
// =============================================================================

/// `INSERT ... ON CONFLICT DO NOTHING`: the primary key decides uniqueness.
async fn insert_edge<C: ConnectionTrait>(
    db: &C,
    follower_id: Uuid,
    followed_id: Uuid,
) -> AppResult<bool> {
    let edge = ActiveModel {
        follower_id: Set(follower_id),
        followed_id: Set(followed_id),
        created_at: Set(chrono::Utc::now()),
    };

    let inserted = RelationshipEntity::insert(edge)
        .on_conflict(
            OnConflict::columns([
                relationship::Column::FollowerId,
                relationship::Column::FollowedId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(inserted > 0)
}

async fn delete_edge<C: ConnectionTrait>(
    db: &C,
    follower_id: Uuid,
    followed_id: Uuid,
) -> AppResult<bool> {
    let result = RelationshipEntity::delete_many()
        .filter(relationship::Column::FollowerId.eq(follower_id))
        .filter(relationship::Column::FollowedId.eq(followed_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

async fn find_edge<C: ConnectionTrait>(
    db: &C,
    follower_id: Uuid,
    followed_id: Uuid,
) -> AppResult<Option<Relationship>> {
    let model = RelationshipEntity::find_by_id((follower_id, followed_id))
        .one(db)
        .await?;

    Ok(model.map(Relationship::from))
}

async fn following_ids<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<HashSet<Uuid>> {
    let ids: Vec<Uuid> = RelationshipEntity::find()
        .select_only()
        .column(relationship::Column::FollowedId)
        .filter(relationship::Column::FollowerId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    Ok(ids.into_iter().collect())
}

pub(crate) async fn delete_edges_touching<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<u64> {
    let result = RelationshipEntity::delete_many()
        .filter(
            Condition::any()
                .add(relationship::Column::FollowerId.eq(user_id))
                .add(relationship::Column::FollowedId.eq(user_id)),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
