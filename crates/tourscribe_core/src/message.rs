//! Message types for conversation history.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single text turn in a conversation.
///
/// # Examples
///
/// ```
/// use tourscribe_core::{Message, Role};
///
/// let message = Message::user("Describe the New River Gorge bridge");
/// assert_eq!(*message.role(), Role::User);
/// assert!(message.content().contains("bridge"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Message {
    /// The role of the message sender
    role: Role,
    /// The text of the message
    content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a model message.
    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }
}
