//! User service - registration, authentication and account removal.
//!
//! Orchestrates domain validation and password hashing over the Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{validate_user, NewUser, Password, User};

use crate::infra::UnitOfWork;

/// What a successful `destroy` removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyedUser {
    pub id: Uuid,
    pub posts_removed: u64,
    pub edges_removed: u64,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Validate and persist a new user.
    ///
    /// Fails with `Validation` listing every broken rule, or `Conflict` when
    /// the email is already taken in any letter case.
    async fn register(&self, candidate: NewUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Get user by email (case-insensitive)
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// Return the user whose digest matches `password`
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;

    /// Remove the user together with their posts and follow edges
    async fn destroy(&self, id: Uuid) -> AppResult<DestroyedUser>;

    /// Total number of users
    async fn count_users(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(&self, candidate: NewUser) -> AppResult<User> {
        let errors = validate_user(&candidate);
        if !errors.is_empty() {
            tracing::debug!(?candidate, count = errors.len(), "Rejected user candidate");
            return Err(AppError::Validation(errors));
        }

        let email = candidate.normalized_email();
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_digest = match candidate.password.as_deref() {
            Some(plain_text) => Some(Password::new(plain_text)?.into_string()),
            None => None,
        };

        let user = self
            .uow
            .users()
            .create(candidate.name, email, password_digest)
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.uow.users().find_by_email(email).await?.ok_or_not_found()
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        match self.uow.users().find_by_email(email).await? {
            Some(user) if user.authenticated(password) => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn destroy(&self, id: Uuid) -> AppResult<DestroyedUser> {
        let destroyed = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.users().find_by_id(id).await?.ok_or_not_found()?;

                    // Edges and posts first; the user row goes last
                    let edges_removed = ctx.relationships().remove_all_edges_for(id).await?;
                    let posts_removed = ctx.posts().delete_by_author(id).await?;
                    ctx.users().delete(id).await?;

                    Ok(DestroyedUser {
                        id,
                        posts_removed,
                        edges_removed,
                    })
                })
            })
            .await?;

        tracing::info!(
            user_id = %id,
            posts_removed = destroyed.posts_removed,
            edges_removed = destroyed.edges_removed,
            "User destroyed"
        );
        Ok(destroyed)
    }

    async fn count_users(&self) -> AppResult<u64> {
        self.uow.users().count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{TransactionContext, TxFuture};
    use crate::repository::{
        MockPostRepository, MockRelationshipRepository, MockUserRepository, PostRepository,
        RelationshipRepository, UserRepository,
    };

    /// Unit of Work over repository mocks; transactions need a real database
    struct TestUnitOfWork {
        user_repo: Arc<MockUserRepository>,
    }

    impl TestUnitOfWork {
        fn new(user_repo: MockUserRepository) -> Self {
            Self {
                user_repo: Arc::new(user_repo),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.user_repo.clone()
        }

        fn posts(&self) -> Arc<dyn PostRepository> {
            Arc::new(MockPostRepository::new())
        }

        fn relationships(&self) -> Arc<dyn RelationshipRepository> {
            Arc::new(MockRelationshipRepository::new())
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    fn service(repo: MockUserRepository) -> UserManager<TestUnitOfWork> {
        UserManager::new(Arc::new(TestUnitOfWork::new(repo)))
    }

    fn stored_user(email: &str, password: Option<&str>) -> User {
        let digest = password.map(|p| Password::new(p).unwrap().into_string());
        User::new(
            Uuid::new_v4(),
            "Lelouch Lamperouge".to_string(),
            email.to_string(),
            digest,
        )
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "lelouch@example.com")
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|name, email, digest| {
                name == "Lelouch Lamperouge"
                    && email == "lelouch@example.com"
                    && digest.as_deref().is_some_and(|d| d.starts_with("$argon2"))
            })
            .times(1)
            .returning(|name, email, digest| Ok(User::new(Uuid::new_v4(), name, email, digest)));

        let candidate = NewUser::new("Lelouch Lamperouge", "Lelouch@Example.COM")
            .with_password("geass1", "geass1");
        let user = service(repo).register(candidate).await.unwrap();

        assert_eq!(user.email, "lelouch@example.com");
        assert!(user.authenticated("geass1"));
        assert!(!user.authenticated("geass2"));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_candidate_without_touching_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().never();
        repo.expect_create().never();

        let candidate = NewUser::new(" ", "not-an-email").with_password("short", "short");
        let err = service(repo).register(candidate).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_in_any_case() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, None))));
        repo.expect_create().never();

        let candidate = NewUser::new("Suzaku Kururugi", "LELOUCH@EXAMPLE.COM");
        let err = service(repo).register(candidate).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref entity) if entity == "Email"));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, Some("geass1")))));

        let user = service(repo)
            .authenticate("lelouch@example.com", "geass1")
            .await
            .unwrap();

        assert_eq!(user.email, "lelouch@example.com");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, Some("geass1")))));

        let err = service(repo)
            .authenticate("lelouch@example.com", "zero")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_user_without_digest() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, None))));

        let err = service(repo)
            .authenticate("lelouch@example.com", "")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let err = service(repo)
            .authenticate("nobody@example.com", "geass1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repo).get_user(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }
}
