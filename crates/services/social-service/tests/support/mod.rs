//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database. The pool holds exactly
//! one connection so the schema lives as long as the test does.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use common::DatabaseConfig;
use domain::{NewUser, Post, SelfFollowPolicy, User};
use social_service::repository::{PostRepository, PostStore};
use social_service::{Database, ServiceContainer, Services, SocialServiceConfig};

pub const LELOUCH_PASSWORD: &str = "geass-contract";

pub struct TestContext {
    pub db: Database,
    pub services: Services,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_policy(SelfFollowPolicy::Reject).await
    }

    pub async fn with_policy(self_follow: SelfFollowPolicy) -> Self {
        init_tracing();

        let config = SocialServiceConfig {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            self_follow,
            feed_page_size: 2,
        };

        let db = Database::connect(&config.database)
            .await
            .expect("in-memory database");
        let services = Services::from_connection(db.get_connection(), &config);

        Self { db, services }
    }

    /// Store-level access for posts with controlled timestamps
    pub fn post_store(&self) -> PostStore {
        PostStore::new(self.db.get_connection())
    }

    pub async fn lelouch(&self) -> User {
        self.services
            .users()
            .register(
                NewUser::new("Lelouch Lamperouge", "lelouch@britannia.example")
                    .with_password(LELOUCH_PASSWORD, LELOUCH_PASSWORD),
            )
            .await
            .expect("register lelouch")
    }

    pub async fn suzaku(&self) -> User {
        self.services
            .users()
            .register(NewUser::new("Suzaku Kururugi", "suzaku@britannia.example"))
            .await
            .expect("register suzaku")
    }

    pub async fn charles(&self) -> User {
        self.services
            .users()
            .register(NewUser::new("Charles zi Britannia", "charles@britannia.example"))
            .await
            .expect("register charles")
    }

    /// Post `content` by `author` at the given minute past noon on 2024-01-01
    pub async fn post_at(&self, author: &User, minute: u32, content: &str) -> Post {
        self.post_store()
            .create(author.id, content.to_string(), at_minute(minute))
            .await
            .expect("create post")
    }
}

pub fn at_minute(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap()
}

pub fn ids(posts: &[Post]) -> Vec<Uuid> {
    posts.iter().map(|p| p.id).collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
