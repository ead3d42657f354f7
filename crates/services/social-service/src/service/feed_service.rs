//! Feed service - posts by a user and everyone they follow.
//!
//! The author set is resolved once when the feed is requested. The returned
//! [`Feed`] is a lazy handle: each call to [`Feed::all`] or [`Feed::page`]
//! issues a single `author_id IN (...)` query against that snapshot, ordered
//! newest first with ties broken by post id.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Paginated, PaginationParams, Post};

use crate::repository::{PostRepository, RelationshipRepository, UserRepository};

/// A user's feed, bound to the authors it had when it was composed.
pub struct Feed {
    owner: Uuid,
    authors: Vec<Uuid>,
    per_page: u64,
    posts: Arc<dyn PostRepository>,
}

impl fmt::Debug for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feed")
            .field("owner", &self.owner)
            .field("authors", &self.authors)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl Feed {
    /// The user this feed belongs to
    pub fn owner(&self) -> Uuid {
        self.owner
    }

    /// Owner first, then followed users
    pub fn authors(&self) -> &[Uuid] {
        &self.authors
    }

    /// Whether `post` belongs in this feed
    pub fn includes(&self, post: &Post) -> bool {
        self.authors.contains(&post.author_id)
    }

    /// Every post in the feed, newest first
    pub async fn all(&self) -> AppResult<Vec<Post>> {
        self.posts.posts_by_authors(self.authors.clone(), None).await
    }

    /// One page of the feed plus totals
    pub async fn page(&self, params: PaginationParams) -> AppResult<Paginated<Post>> {
        let (data, total) = tokio::try_join!(
            self.posts.posts_by_authors(self.authors.clone(), Some(params)),
            self.posts.count_by_authors(self.authors.clone())
        )?;

        Ok(Paginated::new(data, params.page, params.limit(), total))
    }

    /// First page at the configured page size
    pub async fn first_page(&self) -> AppResult<Paginated<Post>> {
        self.page(PaginationParams::new(1, self.per_page)).await
    }
}

/// Feed service trait for dependency injection.
#[async_trait]
pub trait FeedService: Send + Sync {
    /// Compose the feed for `user_id`; `NotFound` if the user does not exist
    async fn feed(&self, user_id: Uuid) -> AppResult<Feed>;
}

/// Concrete implementation of FeedService using repositories.
pub struct FeedComposer {
    users: Arc<dyn UserRepository>,
    relationships: Arc<dyn RelationshipRepository>,
    posts: Arc<dyn PostRepository>,
    per_page: u64,
}

impl FeedComposer {
    /// Create new feed service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        relationships: Arc<dyn RelationshipRepository>,
        posts: Arc<dyn PostRepository>,
        per_page: u64,
    ) -> Self {
        Self {
            users,
            relationships,
            posts,
            per_page,
        }
    }
}

#[async_trait]
impl FeedService for FeedComposer {
    async fn feed(&self, user_id: Uuid) -> AppResult<Feed> {
        let (exists, following) = tokio::try_join!(
            self.users.exists(user_id),
            self.relationships.following(user_id)
        )?;

        if !exists {
            return Err(AppError::NotFound);
        }

        // A permitted self-follow must not list the owner twice
        let mut followed: Vec<Uuid> = following.into_iter().filter(|id| *id != user_id).collect();
        followed.sort();

        let mut authors = Vec::with_capacity(followed.len() + 1);
        authors.push(user_id);
        authors.extend(followed);

        tracing::debug!(user_id = %user_id, authors = authors.len(), "Feed composed");

        Ok(Feed {
            owner: user_id,
            authors,
            per_page: self.per_page,
            posts: self.posts.clone(),
        })
    }
}
