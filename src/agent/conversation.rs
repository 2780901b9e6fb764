//! Append-only conversation state

use crate::types::messages::{Role, Turn};

/// Ordered turns of one request
///
/// Turns are only ever appended; earlier turns are never edited or dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Seed with an optional system turn and the user request
    pub fn new(system_prompt: Option<&str>, request: &str) -> Self {
        let mut turns = Vec::with_capacity(2);
        if let Some(prompt) = system_prompt {
            turns.push(Turn::system(prompt));
        }
        turns.push(Turn::user(request));
        Self { turns }
    }

    /// Append a turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns with the given role
    pub fn count(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }
}
