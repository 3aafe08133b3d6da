//! Send-state storage for the reminder state machine
//!
//! Each (user, task) pair has two states: not sent and sent, with sent
//! terminal for the store's lifetime. The trait exists so a durable or
//! shared store can replace the in-memory default when more than one
//! scheduler instance needs to coordinate.

use std::collections::HashSet;

use tracing::debug;

/// Dedup key: one reminder per user per task
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub user_id: String,
    pub task_id: String,
}

impl ReminderKey {
    pub fn new(user_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            task_id: task_id.into(),
        }
    }
}

/// Keyed send-state store; `mark_sent` is irreversible per key.
pub trait SentStore: Send {
    fn has_sent(&self, key: &ReminderKey) -> bool;
    fn mark_sent(&mut self, key: ReminderKey);
}

/// Process-local store; state resets on restart by design.
#[derive(Debug, Default)]
pub struct InMemorySentStore {
    sent: HashSet<ReminderKey>,
}

impl InMemorySentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

impl SentStore for InMemorySentStore {
    fn has_sent(&self, key: &ReminderKey) -> bool {
        self.sent.contains(key)
    }

    fn mark_sent(&mut self, key: ReminderKey) {
        debug!(user_id = %key.user_id, task_id = %key.task_id, "mark_sent: called");
        self.sent.insert(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_key_is_not_sent() {
        let store = InMemorySentStore::new();
        assert!(!store.has_sent(&ReminderKey::new("u1", "t1")));
    }

    #[test]
    fn test_mark_sent_is_sticky() {
        let mut store = InMemorySentStore::new();
        store.mark_sent(ReminderKey::new("u1", "t1"));
        assert!(store.has_sent(&ReminderKey::new("u1", "t1")));
        // Re-marking stays a no-op
        store.mark_sent(ReminderKey::new("u1", "t1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_keys_are_per_user_and_task() {
        let mut store = InMemorySentStore::new();
        store.mark_sent(ReminderKey::new("u1", "t1"));
        assert!(!store.has_sent(&ReminderKey::new("u1", "t2")));
        assert!(!store.has_sent(&ReminderKey::new("u2", "t1")));
    }
}
