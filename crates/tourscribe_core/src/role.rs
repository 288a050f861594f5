//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Conversation roles understood by every backend.
///
/// System instructions travel separately on the request
/// (see [`GenerateRequest`](crate::GenerateRequest)), so only the two
/// conversational roles appear in messages.
///
/// # Examples
///
/// ```
/// use tourscribe_core::Role;
///
/// assert_ne!(Role::User, Role::Model);
/// assert_eq!(format!("{}", Role::User), "User");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// The caller's turn
    User,
    /// The model's turn
    Model,
}
