use serde::{Deserialize, Serialize};

/// The role of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text submitted by the user.
    User,
    /// A reply produced by the model.
    Assistant,
}

/// One message unit in a conversation.
///
/// A turn is immutable once created; ordering between turns is the
/// conversation order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn.
    pub role: Role,
    /// The text content.
    pub content: String,
}

impl Turn {
    /// Creates a user turn with the given content.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn with the given content.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The full ordered conversation history, oldest turn first.
    pub messages: Vec<Turn>,
}
