use super::types::Message;
use std::collections::VecDeque;

/// Default number of messages forwarded to the voice client as context
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Conversation transcript, newest message first
///
/// Append-only apart from [`Transcript::clear`]. Messages keep their arrival
/// order even when two of them carry the same timestamp.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: VecDeque<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push_front(message);
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn latest(&self) -> Option<&Message> {
        self.messages.front()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Bounded ring of the most recent messages, oldest first
#[derive(Debug, Clone)]
pub struct ContextWindow {
    capacity: usize,
    entries: VecDeque<Message>,
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

impl ContextWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, message: Message) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
