//! Per-user link registry
//!
//! Remembers the last URL each user submitted so a later format-choice
//! button press knows what to download. One pending URL per user; a new
//! submission overwrites the previous one.

use dashmap::DashMap;
use teloxide::types::ChatId;

use crate::download::error::DownloadError;

/// Canonicalizes a submitted link by truncating at the first `&`.
///
/// This keeps the primary query parameter (`?v=ID`, `?list=ID`) and drops
/// tracking suffixes, so `watch?v=ABC&list=XYZ` becomes `watch?v=ABC`.
pub fn clean_link(raw: &str) -> String {
    raw.trim().split('&').next().unwrap_or("").to_string()
}

/// Concurrency-safe map from user chat to their pending URL.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    links: DashMap<ChatId, String>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the canonical form of `raw` for this user, overwriting any
    /// prior value, and returns it.
    pub fn submit(&self, chat_id: ChatId, raw: &str) -> String {
        let link = clean_link(raw);
        self.links.insert(chat_id, link.clone());
        link
    }

    /// Looks up the pending URL for this user.
    ///
    /// Absence is an expired session (the user pressed a format button
    /// without a stored link), surfaced as a recoverable error.
    pub fn resolve(&self, chat_id: ChatId) -> Result<String, DownloadError> {
        self.links
            .get(&chat_id)
            .map(|entry| entry.clone())
            .ok_or(DownloadError::ExpiredSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_link_truncates_at_first_ampersand() {
        assert_eq!(
            clean_link("https://youtube.com/watch?v=ABC&list=XYZ&t=42"),
            "https://youtube.com/watch?v=ABC"
        );
    }

    #[test]
    fn clean_link_keeps_primary_query_parameter() {
        assert_eq!(
            clean_link("https://youtube.com/playlist?list=PL123"),
            "https://youtube.com/playlist?list=PL123"
        );
    }

    #[test]
    fn clean_link_trims_whitespace() {
        assert_eq!(clean_link("  https://example.com/v  "), "https://example.com/v");
    }

    #[test]
    fn submit_overwrites_previous_link() {
        let registry = LinkRegistry::new();
        let chat = ChatId(1);
        registry.submit(chat, "https://youtube.com/watch?v=first");
        registry.submit(chat, "https://youtube.com/watch?v=second&feature=share");

        assert_eq!(registry.resolve(chat).unwrap(), "https://youtube.com/watch?v=second");
    }

    #[test]
    fn resolve_without_submit_is_expired_session() {
        let registry = LinkRegistry::new();
        let err = registry.resolve(ChatId(99)).unwrap_err();
        assert!(matches!(err, DownloadError::ExpiredSession));
    }

    #[test]
    fn links_are_isolated_per_user() {
        let registry = LinkRegistry::new();
        registry.submit(ChatId(1), "https://a.example/one");
        registry.submit(ChatId(2), "https://b.example/two");

        assert_eq!(registry.resolve(ChatId(1)).unwrap(), "https://a.example/one");
        assert_eq!(registry.resolve(ChatId(2)).unwrap(), "https://b.example/two");
    }
}
