//! Chat message models.

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Originator {
    User,
    Bot,
}

/// A single chat bubble. Messages are kept in insertion order and never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Millisecond timestamp, strictly increasing within one chat
    pub id: i64,
    pub text: String,
    pub originator: Originator,
}

impl ChatMessage {
    pub fn is_from_user(&self) -> bool {
        self.originator == Originator::User
    }
}

/// Issues timestamp-derived message ids that never repeat or go backwards,
/// even when two messages land in the same millisecond.
#[derive(Debug, Default)]
pub struct MessageIdClock {
    last: i64,
}

impl MessageIdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let id = now.max(self.last + 1);
        self.last = id;
        id
    }
}
