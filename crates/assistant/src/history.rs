//! Bounded sliding-window conversation history.
//!
//! One instance per active conversation. Turns are appended in user +
//! assistant pairs; when the buffer exceeds its bound the oldest turns
//! are dropped first.

use sonjutalk_core::message::Message;

/// Session-scoped conversation buffer holding at most
/// `2 * max_exchanges` turns.
#[derive(Debug)]
pub struct HistoryManager {
    turns: Vec<Message>,
    max_exchanges: usize,
}

impl HistoryManager {
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_exchanges,
        }
    }

    /// Append one exchange (user turn + assistant turn), then truncate
    /// from the front down to the retention bound.
    pub fn append(&mut self, user: Message, assistant: Message) {
        self.turns.push(user);
        self.turns.push(assistant);

        let cap = self.max_exchanges * 2;
        if self.turns.len() > cap {
            let excess = self.turns.len() - cap;
            self.turns.drain(..excess);
        }
    }

    /// The retained turns, oldest first.
    pub fn snapshot(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(i: usize) -> (Message, Message) {
        (
            Message::user(format!("질문 {i}")),
            Message::assistant(format!("답변 {i}")),
        )
    }

    #[test]
    fn append_stores_pairs_in_order() {
        let mut history = HistoryManager::new(10);
        let (user, assistant) = exchange(0);
        history.append(user, assistant);

        assert_eq!(history.len(), 2);
        assert_eq!(history.snapshot()[0].content, "질문 0");
        assert_eq!(history.snapshot()[1].content, "답변 0");
    }

    #[test]
    fn window_drops_oldest_first() {
        let mut history = HistoryManager::new(10);
        for i in 0..15 {
            let (user, assistant) = exchange(i);
            history.append(user, assistant);
        }

        // 15 appends at max_exchanges=10 keep exactly the 10 most recent pairs.
        assert_eq!(history.len(), 20);
        assert_eq!(history.snapshot()[0].content, "질문 5");
        assert_eq!(history.snapshot()[19].content, "답변 14");
    }

    #[test]
    fn under_capacity_keeps_everything() {
        let mut history = HistoryManager::new(10);
        for i in 0..3 {
            let (user, assistant) = exchange(i);
            history.append(user, assistant);
        }
        assert_eq!(history.len(), 6);
        assert_eq!(history.snapshot()[0].content, "질문 0");
    }
}
