//! Integration tests for the session flow building blocks
//!
//! Exercises the registry → resolver → counter chain the way the callback
//! handler drives it, without a live Telegram transport.
//!
//! Run with: cargo test --test session_flow_test

use pretty_assertions::assert_eq;
use teloxide::types::ChatId;

use vidgrab::core::links::LinkRegistry;
use vidgrab::core::stats::DownloadCounter;
use vidgrab::download::error::DownloadError;
use vidgrab::download::format::{is_playlist_url, resolve_selector, Format, PLAYLIST_BEST};

#[test]
fn submitted_watch_link_resolves_to_bounded_selector() {
    let registry = LinkRegistry::new();
    let chat = ChatId(1);

    // Tracking suffix is stripped at submission
    let stored = registry.submit(chat, "https://youtube.com/watch?v=ABC&list=XYZ");
    assert_eq!(stored, "https://youtube.com/watch?v=ABC");
    assert_eq!(registry.resolve(chat).unwrap(), "https://youtube.com/watch?v=ABC");

    // Choosing 720p on the canonical (non-playlist) URL stays bounded
    let url = registry.resolve(chat).unwrap();
    let format = Format::from_token("720p").unwrap();
    assert!(!is_playlist_url(&url));
    assert_eq!(
        resolve_selector(format, is_playlist_url(&url)),
        "bestvideo[height<=720]+bestaudio/best"
    );
}

#[test]
fn playlist_link_gets_best_effort_selector_for_any_resolution() {
    let registry = LinkRegistry::new();
    let chat = ChatId(2);

    registry.submit(chat, "https://youtube.com/playlist?list=PL123");
    let url = registry.resolve(chat).unwrap();
    assert!(is_playlist_url(&url));

    let format = Format::from_token("1080p").unwrap();
    assert_eq!(resolve_selector(format, is_playlist_url(&url)), PLAYLIST_BEST);
}

#[test]
fn format_choice_without_submission_is_expired_session() {
    let registry = LinkRegistry::new();
    let err = registry.resolve(ChatId(3)).unwrap_err();
    assert!(matches!(err, DownloadError::ExpiredSession));
}

#[test]
fn counter_tracks_one_increment_per_successful_flow() {
    let registry = LinkRegistry::new();
    let counter = DownloadCounter::new();
    let chat = ChatId(4);

    // Three successful flows for one user, one for another
    for k in 1..=3 {
        registry.submit(chat, "https://youtube.com/watch?v=ok");
        assert!(registry.resolve(chat).is_ok());
        assert_eq!(counter.increment(chat), k);
    }
    assert_eq!(counter.increment(ChatId(5)), 1);

    // A failed flow (expired session) never touches the counter
    assert!(registry.resolve(ChatId(6)).is_err());
    assert_eq!(counter.get(ChatId(6)), 0);

    assert_eq!(counter.get(chat), 3);
}

#[tokio::test]
async fn users_progress_through_independent_sessions() {
    use std::sync::Arc;

    let registry = Arc::new(LinkRegistry::new());
    let counter = Arc::new(DownloadCounter::new());

    let mut tasks = Vec::new();
    for user in 0..8i64 {
        let registry = Arc::clone(&registry);
        let counter = Arc::clone(&counter);
        tasks.push(tokio::spawn(async move {
            let chat = ChatId(user);
            for _ in 0..10 {
                registry.submit(chat, &format!("https://youtube.com/watch?v=u{}&t=1", user));
                let url = registry.resolve(chat).unwrap();
                assert_eq!(url, format!("https://youtube.com/watch?v=u{}", user));
                counter.increment(chat);
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for user in 0..8i64 {
        assert_eq!(counter.get(ChatId(user)), 10);
    }
}
