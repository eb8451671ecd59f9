//! Conversation Session Model
//!
//! A `Session` is one cached multi-turn roleplay conversation between a
//! learner and the tutor persona, bound to exactly one mission and one user.
//! Sessions live only in the [`crate::store::SessionStore`]; they are never
//! persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message in the transcript.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in a session's transcript.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// One in-memory roleplay conversation.
///
/// `mission_id` and `user_id` are fixed at creation; the transcript is
/// append-only while the session is alive. The runtime enforces both rules
/// by never handing out mutable access to an existing session's identity.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    mission_id: String,
    user_id: String,
    pub messages: Vec<ChatMessage>,
}

impl Session {
    /// Creates an empty session bound to a mission and its owning learner.
    pub fn new(session_id: String, mission_id: String, user_id: String) -> Self {
        Self {
            session_id,
            mission_id,
            user_id,
            messages: Vec::new(),
        }
    }

    pub fn mission_id(&self) -> &str {
        &self.mission_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Appends a message to the transcript.
    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
    }
}
