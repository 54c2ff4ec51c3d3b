//! Core utilities: configuration, errors, process execution, and per-user state.

pub mod config;
pub mod error;
pub mod links;
pub mod process;
pub mod stats;

pub use error::AppError;
pub use links::{clean_link, LinkRegistry};
pub use process::{run_with_timeout, ProcessError};
pub use stats::DownloadCounter;
