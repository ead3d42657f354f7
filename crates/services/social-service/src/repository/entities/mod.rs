//! SeaORM entity definitions.
//!
//! These are database-specific entities separate from domain models.

pub mod post;
pub mod relationship;
pub mod user;
