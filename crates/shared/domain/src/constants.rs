//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Validation
// =============================================================================

/// Maximum user display name length (characters)
pub const MAX_NAME_LENGTH: u64 = 50;

/// Maximum email address length (characters)
pub const MAX_EMAIL_LENGTH: u64 = 255;

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Accepted shape of an email address (`local@domain.tld`), matched case-insensitively
pub const EMAIL_PATTERN: &str = r"(?i)^[A-Za-z0-9_+\-.]+@[a-z0-9\-]+(\.[a-z0-9\-]+)*\.[a-z]+$";

// =============================================================================
// Posts
// =============================================================================

/// Maximum post content length (characters)
pub const MAX_POST_LENGTH: u64 = 140;

// =============================================================================
// Feed & Pagination
// =============================================================================

/// Default number of posts per feed page
pub const DEFAULT_PAGE_SIZE: u64 = 30;

/// Maximum allowed posts per page to keep feed queries bounded
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;
