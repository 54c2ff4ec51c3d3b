//! Per-user download statistics
//!
//! In-memory tally of completed downloads per user. Incremented exactly
//! once per successful end-to-end delivery, never on a failure path, and
//! never reset within the process lifetime.

use dashmap::DashMap;
use teloxide::types::ChatId;

/// Concurrency-safe per-user counter of completed downloads.
#[derive(Debug, Default)]
pub struct DownloadCounter {
    counts: DashMap<ChatId, u64>,
}

impl DownloadCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically increments this user's tally and returns the new count.
    pub fn increment(&self, chat_id: ChatId) -> u64 {
        let mut entry = self.counts.entry(chat_id).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current tally for a user (0 if they have never completed a download).
    pub fn get(&self, chat_id: ChatId) -> u64 {
        self.counts.get(&chat_id).map(|entry| *entry).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn increment_returns_new_count() {
        let counter = DownloadCounter::new();
        assert_eq!(counter.increment(ChatId(7)), 1);
        assert_eq!(counter.increment(ChatId(7)), 2);
        assert_eq!(counter.increment(ChatId(7)), 3);
    }

    #[test]
    fn counts_are_per_user() {
        let counter = DownloadCounter::new();
        counter.increment(ChatId(1));
        counter.increment(ChatId(1));
        counter.increment(ChatId(2));

        assert_eq!(counter.get(ChatId(1)), 2);
        assert_eq!(counter.get(ChatId(2)), 1);
        assert_eq!(counter.get(ChatId(3)), 0);
    }
}
