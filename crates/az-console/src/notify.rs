//! Notification Queue
//!
//! Transient messages shown after mutations and exports. The queue keeps
//! the newest entries last and drops the oldest beyond its capacity.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Shared, bounded notification queue; clones share the same queue
#[derive(Clone)]
pub struct Notifications {
    entries: Arc<Mutex<VecDeque<Notification>>>,
    next_id: Arc<AtomicU64>,
    capacity: usize,
}

impl Notifications {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            next_id: Arc::new(AtomicU64::new(1)),
            capacity,
        }
    }

    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let notification = Notification {
            id,
            level,
            message: message.into(),
            created_at: Utc::now(),
        };
        debug!(id, level = ?level, message = %notification.message, "Notification");

        let mut entries = self.entries.lock();
        entries.push_back(notification);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationLevel::Info, message)
    }

    /// Remove one entry; false if it was already gone
    pub fn dismiss(&self, id: u64) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_dropped_beyond_capacity() {
        let notifications = Notifications::new(3);
        for i in 0..5 {
            notifications.info(format!("n{}", i));
        }
        let messages: Vec<String> = notifications.snapshot().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["n2", "n3", "n4"]);
    }

    #[test]
    fn test_dismiss() {
        let notifications = Notifications::default();
        let id = notifications.error("Eroare");
        notifications.success("Student creat cu succes");
        assert!(notifications.dismiss(id));
        assert!(!notifications.dismiss(id));
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications.snapshot()[0].level, NotificationLevel::Success);
    }

    #[test]
    fn test_clones_share_queue() {
        let a = Notifications::new(0);
        let b = a.clone();
        b.warning("x");
        b.warning("y");
        assert_eq!(a.capacity(), 1);
        assert_eq!(a.snapshot()[0].message, "y");
    }
}
