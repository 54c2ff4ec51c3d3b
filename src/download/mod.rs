//! Download pipeline: format resolution, metadata probing, fetch execution,
//! and delivery packaging.

pub mod error;
pub mod fetch;
pub mod format;
pub mod metadata;
pub mod send;
pub mod ytdlp;

pub use error::DownloadError;
pub use fetch::{fetch, JobDir};
pub use format::{is_playlist_url, resolve_selector, Format};
pub use metadata::{estimate_size, preview, MediaPreview};
pub use send::{deliver, DeliveryOutcome, DeliverySink};
