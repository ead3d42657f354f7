//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns transaction boundaries, so that
//! multi-table operations such as destroying a user (edges, posts, then the
//! user row) commit or roll back together.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

use crate::repository::{
    delete_edges_touching, delete_posts_by_author, delete_user, find_user, PostRepository,
    PostStore, RelationshipRepository, RelationshipStore, UserRepository, UserStore,
};
use common::{AppError, AppResult};
use domain::User;

/// Boxed future returned by transaction bodies.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction method; tests
/// supply a hand-written implementation around the repository mocks.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get post repository
    fn posts(&self) -> Arc<dyn PostRepository>;

    /// Get relationship repository
    fn relationships(&self) -> Arc<dyn RelationshipRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// User repository bound to this transaction
    pub fn users(&self) -> TxUserRepository<'a> {
        TxUserRepository { txn: self.txn }
    }

    /// Post repository bound to this transaction
    pub fn posts(&self) -> TxPostRepository<'a> {
        TxPostRepository { txn: self.txn }
    }

    /// Relationship repository bound to this transaction
    pub fn relationships(&self) -> TxRelationshipRepository<'a> {
        TxRelationshipRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    post_repo: Arc<PostStore>,
    relationship_repo: Arc<RelationshipStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            post_repo: Arc::new(PostStore::new(db.clone())),
            relationship_repo: Arc::new(RelationshipStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.post_repo.clone()
    }

    fn relationships(&self) -> Arc<dyn RelationshipRepository> {
        self.relationship_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxUserRepository<'_> {
    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_user(self.txn, id).await
    }

    /// Delete the user row; `NotFound` if it does not exist
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete_user(self.txn, id).await
    }
}

/// Transaction-aware post repository.
pub struct TxPostRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxPostRepository<'_> {
    /// Delete every post by `author_id`
    pub async fn delete_by_author(&self, author_id: Uuid) -> AppResult<u64> {
        delete_posts_by_author(self.txn, author_id).await
    }
}

/// Transaction-aware relationship repository.
pub struct TxRelationshipRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxRelationshipRepository<'_> {
    /// Remove every edge touching `user_id`
    pub async fn remove_all_edges_for(&self, user_id: Uuid) -> AppResult<u64> {
        delete_edges_touching(self.txn, user_id).await
    }
}
