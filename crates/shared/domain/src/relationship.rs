//! Follow relationship between two users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Directed follow edge: `follower_id` follows `followed_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Whether a user may follow themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfFollowPolicy {
    /// Self-follow attempts fail with `InvalidArgument`
    #[default]
    Reject,
    /// Self-follow creates an ordinary edge
    Allow,
}

impl SelfFollowPolicy {
    /// Check a prospective edge against this policy.
    pub fn check(self, follower_id: Uuid, followed_id: Uuid) -> DomainResult<()> {
        if follower_id == followed_id && self == SelfFollowPolicy::Reject {
            return Err(DomainError::invalid_argument("a user cannot follow themselves"));
        }
        Ok(())
    }
}

impl From<bool> for SelfFollowPolicy {
    fn from(allow: bool) -> Self {
        if allow {
            SelfFollowPolicy::Allow
        } else {
            SelfFollowPolicy::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_policy_refuses_self_follow() {
        let id = Uuid::new_v4();
        assert!(matches!(
            SelfFollowPolicy::Reject.check(id, id),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(SelfFollowPolicy::Reject.check(id, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_allow_policy_permits_self_follow() {
        let id = Uuid::new_v4();
        assert!(SelfFollowPolicy::Allow.check(id, id).is_ok());
    }

    #[test]
    fn test_default_is_reject() {
        assert_eq!(SelfFollowPolicy::default(), SelfFollowPolicy::Reject);
        assert_eq!(SelfFollowPolicy::from(true), SelfFollowPolicy::Allow);
    }
}
