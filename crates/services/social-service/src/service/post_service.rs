//! Post service - publishing and reading a single author's posts.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{validate_post, NewPost, Post};

use crate::repository::{PostRepository, UserRepository};

/// Post service trait for dependency injection.
#[async_trait]
pub trait PostService: Send + Sync {
    /// Validate and persist a post for an existing author
    async fn publish(&self, author_id: Uuid, candidate: NewPost) -> AppResult<Post>;

    /// Posts by one author, newest first
    async fn posts_by(&self, author_id: Uuid) -> AppResult<Vec<Post>>;

    /// Get post by ID
    async fn get_post(&self, id: Uuid) -> AppResult<Post>;

    /// Total number of posts
    async fn count_posts(&self) -> AppResult<u64>;
}

/// Concrete implementation of PostService using repositories.
pub struct PostManager {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl PostManager {
    /// Create new post service instance
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    async fn ensure_author(&self, author_id: Uuid) -> AppResult<()> {
        if self.users.exists(author_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}

#[async_trait]
impl PostService for PostManager {
    async fn publish(&self, author_id: Uuid, candidate: NewPost) -> AppResult<Post> {
        let errors = validate_post(&candidate);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        self.ensure_author(author_id).await?;

        let post = self
            .posts
            .create(author_id, candidate.content, Utc::now())
            .await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post published");
        Ok(post)
    }

    async fn posts_by(&self, author_id: Uuid) -> AppResult<Vec<Post>> {
        self.ensure_author(author_id).await?;
        self.posts.find_by_author(author_id).await
    }

    async fn get_post(&self, id: Uuid) -> AppResult<Post> {
        self.posts.find_by_id(id).await?.ok_or_not_found()
    }

    async fn count_posts(&self) -> AppResult<u64> {
        self.posts.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockPostRepository, MockUserRepository};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_publish_persists_for_existing_author() {
        let author_id = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        users.expect_exists().with(eq(author_id)).returning(|_| Ok(true));

        let mut posts = MockPostRepository::new();
        posts
            .expect_create()
            .withf(move |author, content, _| *author == author_id && content == "All hail Britannia")
            .times(1)
            .returning(|author_id, content, created_at| {
                Ok(Post {
                    id: Uuid::new_v4(),
                    author_id,
                    content,
                    created_at,
                })
            });

        let service = PostManager::new(Arc::new(users), Arc::new(posts));
        let post = service
            .publish(author_id, NewPost::new("All hail Britannia"))
            .await
            .unwrap();

        assert_eq!(post.author_id, author_id);
        assert_eq!(post.content, "All hail Britannia");
    }

    #[tokio::test]
    async fn test_publish_rejects_overlong_content() {
        let mut users = MockUserRepository::new();
        users.expect_exists().never();
        let mut posts = MockPostRepository::new();
        posts.expect_create().never();

        let service = PostManager::new(Arc::new(users), Arc::new(posts));
        let err = service
            .publish(Uuid::new_v4(), NewPost::new("a".repeat(141)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.field_errors()[0].field, "content");
    }

    #[tokio::test]
    async fn test_publish_unknown_author() {
        let mut users = MockUserRepository::new();
        users.expect_exists().returning(|_| Ok(false));
        let mut posts = MockPostRepository::new();
        posts.expect_create().never();

        let service = PostManager::new(Arc::new(users), Arc::new(posts));
        let err = service
            .publish(Uuid::new_v4(), NewPost::new("Yes, your majesty"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let users = MockUserRepository::new();
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().returning(|_| Ok(None));

        let service = PostManager::new(Arc::new(users), Arc::new(posts));
        let err = service.get_post(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }
}
