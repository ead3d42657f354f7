//! Social service configuration.

use std::env;
use std::str::FromStr;

use common::DatabaseConfig;
use domain::{SelfFollowPolicy, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Social service configuration.
#[derive(Debug, Clone)]
pub struct SocialServiceConfig {
    /// Connection pool settings
    pub database: DatabaseConfig,
    /// Whether users may follow themselves
    pub self_follow: SelfFollowPolicy,
    /// Page size for `Feed::first_page`
    pub feed_page_size: u64,
}

impl SocialServiceConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: env::var("SOCIAL_SERVICE_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or(defaults.url),
            max_connections: parse_var("SOCIAL_SERVICE_MAX_CONNECTIONS")
                .unwrap_or(defaults.max_connections),
            min_connections: parse_var("SOCIAL_SERVICE_MIN_CONNECTIONS")
                .unwrap_or(defaults.min_connections),
        };

        let self_follow = env::var("SOCIAL_SERVICE_ALLOW_SELF_FOLLOW")
            .ok()
            .and_then(|v| parse_flag(&v))
            .map(SelfFollowPolicy::from)
            .unwrap_or_default();

        let feed_page_size = parse_var("SOCIAL_SERVICE_FEED_PAGE_SIZE")
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        Self {
            database,
            self_follow,
            feed_page_size,
        }
    }

    /// Configuration for a given database URL, everything else defaulted.
    pub fn with_database(database: DatabaseConfig) -> Self {
        Self {
            database,
            ..Self::default()
        }
    }
}

impl Default for SocialServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            self_follow: SelfFollowPolicy::default(),
            feed_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
