//! Conversation-state types.

use minichat_model::Turn;

/// An ordered, append-only history of conversation turns.
///
/// The history is owned by a single session and grows monotonically: turns
/// are appended as they are produced and are never mutated, removed, or
/// reordered. The user/assistant alternation comes from the session loop
/// driving it, the container itself doesn't enforce it.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Returns the turns in conversation order.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if there are no turns yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[inline]
    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }
}

#[cfg(test)]
mod tests {
    use minichat_model::Role;

    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut conversation = Conversation::default();
        assert!(conversation.is_empty());

        conversation.push(Turn::user("Hi"));
        conversation.push(Turn::assistant("Hello!"));
        conversation.push(Turn::user("How are you?"));

        assert_eq!(conversation.len(), 3);
        let roles: Vec<Role> =
            conversation.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(conversation.turns()[1].content, "Hello!");
    }
}
