//! Post store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::entities::post::{self, ActiveModel, Entity as PostEntity};
use common::AppResult;
use domain::{PaginationParams, Post};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Post repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a post (content already validated)
    async fn create(
        &self,
        author_id: Uuid,
        content: String,
        created_at: DateTime<Utc>,
    ) -> AppResult<Post>;

    /// Find a post by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    /// Posts by a single author, newest first
    async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Post>>;

    /// Posts by any of `author_ids`, newest first, ties broken by id.
    ///
    /// One query regardless of how many authors are given. `page` bounds
    /// the result; `None` returns everything.
    async fn posts_by_authors(
        &self,
        author_ids: Vec<Uuid>,
        page: Option<PaginationParams>,
    ) -> AppResult<Vec<Post>>;

    /// Number of posts by any of `author_ids`
    async fn count_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<u64>;

    /// Total number of posts
    async fn count(&self) -> AppResult<u64>;

    /// Delete every post by `author_id`; returns the number removed
    async fn delete_by_author(&self, author_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of PostRepository
pub struct PostStore {
    db: DatabaseConnection,
}

impl PostStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostStore {
    async fn create(
        &self,
        author_id: Uuid,
        content: String,
        created_at: DateTime<Utc>,
    ) -> AppResult<Post> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            author_id: Set(author_id),
            content: Set(content),
            created_at: Set(created_at),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Post::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        let result = PostEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Post::from))
    }

    async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Post>> {
        let models = newest_first(PostEntity::find().filter(post::Column::AuthorId.eq(author_id)))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Post::from).collect())
    }

    async fn posts_by_authors(
        &self,
        author_ids: Vec<Uuid>,
        page: Option<PaginationParams>,
    ) -> AppResult<Vec<Post>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query =
            newest_first(PostEntity::find().filter(post::Column::AuthorId.is_in(author_ids)));
        if let Some(page) = page {
            query = query.offset(page.offset()).limit(page.limit());
        }

        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(Post::from).collect())
    }

    async fn count_by_authors(&self, author_ids: Vec<Uuid>) -> AppResult<u64> {
        if author_ids.is_empty() {
            return Ok(0);
        }

        let count = PostEntity::find()
            .filter(post::Column::AuthorId.is_in(author_ids))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn count(&self) -> AppResult<u64> {
        let count = PostEntity::find().count(&self.db).await?;
        Ok(count)
    }

    async fn delete_by_author(&self, author_id: Uuid) -> AppResult<u64> {
        delete_posts_by_author(&self.db, author_id).await
    }
}

/// Feed order: `created_at DESC, id DESC` gives a deterministic total order.
fn newest_first(query: Select<PostEntity>) -> Select<PostEntity> {
    query
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

pub(crate) async fn delete_posts_by_author<C: ConnectionTrait>(
    db: &C,
    author_id: Uuid,
) -> AppResult<u64> {
    let result = PostEntity::delete_many()
        .filter(post::Column::AuthorId.eq(author_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
