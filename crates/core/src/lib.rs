//! `taskdeck-core`: primitives shared by every TaskDeck crate.
//!
//! Nothing here knows about roles, sessions or UI; it only holds identifiers
//! and the error model used at parsing boundaries.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
