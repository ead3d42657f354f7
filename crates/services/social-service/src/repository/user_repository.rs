//! User store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{normalize_email, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address (case-insensitive)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Whether a user with this ID exists
    async fn exists(&self, id: Uuid) -> AppResult<bool>;

    /// Create a new user (fields already validated, email normalized)
    async fn create(
        &self,
        name: String,
        email: String,
        password_digest: Option<String>,
    ) -> AppResult<User>;

    /// Total number of users
    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_user(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let count = UserEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn create(
        &self,
        name: String,
        email: String,
        password_digest: Option<String>,
    ) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(normalize_email(&email)),
            password_digest: Set(password_digest),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // A concurrent registration can still win the race to the unique index
        let model = active_model.insert(&self.db).await.map_err(|e| match AppError::from(e) {
            AppError::ConstraintViolation(_) => AppError::conflict("Email"),
            other => other,
        })?;

        Ok(User::from(model))
    }

    async fn count(&self) -> AppResult<u64> {
        let count = UserEntity::find().count(&self.db).await?;
        Ok(count)
    }
}

pub(crate) async fn find_user<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
    let result = UserEntity::find_by_id(id).one(db).await?;
    Ok(result.map(User::from))
}

pub(crate) async fn delete_user<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = UserEntity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}
