//! Delivery packaging
//!
//! Ships the contents of a job directory back to the user: more than three
//! files are packed into a single zip archive, one to three files are sent
//! individually with an `i/N` progress notice, and an empty directory is
//! surfaced as an explicit "no output" error instead of silence.
//!
//! Sending goes through the [`DeliverySink`] trait so tests can substitute
//! a recording sink for the Telegram transport.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use teloxide::types::ChatId;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::core::config::delivery::{ARCHIVE_NAME, ARCHIVE_THRESHOLD};
use crate::core::error::AppError;
use crate::download::error::DownloadError;

/// Outbound transport seam for delivery.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), AppError>;
    async fn send_document(&self, chat_id: ChatId, path: &Path) -> Result<(), AppError>;
}

/// What a delivery run accomplished.
#[derive(Debug, Default)]
pub struct DeliveryOutcome {
    /// Number of documents successfully sent (the archive counts as one).
    pub sent: usize,
    /// File names whose transfer failed. Failures here do not abort the
    /// delivery of the remaining files.
    pub failed: Vec<String>,
}

impl DeliveryOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Lists the regular files in the job directory in name order.
///
/// Name order keeps delivery progress deterministic for multi-file
/// downloads.
fn list_output_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files: Vec<PathBuf> = fs_err::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Packs `files` into a deflate-compressed zip at `dest`.
fn write_archive(files: &[PathBuf], dest: &Path) -> Result<(), std::io::Error> {
    let out = fs_err::File::create(dest)?;
    let mut archive = zip::ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        archive.start_file(name, options).map_err(std::io::Error::other)?;
        let mut src = fs_err::File::open(path)?;
        std::io::copy(&mut src, &mut archive)?;
    }

    archive.finish().map_err(std::io::Error::other)?.flush()?;
    Ok(())
}

/// Delivers everything in `dir` to the user.
///
/// - more than [`ARCHIVE_THRESHOLD`] files: one zip is built, sent, and
///   removed; the originals are removed too once the archive went out.
/// - 1..=[`ARCHIVE_THRESHOLD`] files: each file is announced as `i/N`,
///   sent, and deleted after a successful send. A failed send is recorded
///   and the remaining files are still attempted.
/// - no files: [`DownloadError::NoOutput`], surfaced to the user by the
///   caller rather than silently dropped.
pub async fn deliver(sink: &dyn DeliverySink, chat_id: ChatId, dir: &Path) -> Result<DeliveryOutcome, DownloadError> {
    let files = list_output_files(dir).map_err(|e| DownloadError::Execution(format!("failed to list output: {}", e)))?;

    if files.is_empty() {
        return Err(DownloadError::NoOutput);
    }

    let mut outcome = DeliveryOutcome::default();

    if files.len() > ARCHIVE_THRESHOLD {
        let archive_path = dir.join(ARCHIVE_NAME);
        log::info!(
            "Packing {} files into {} for chat {}",
            files.len(),
            archive_path.display(),
            chat_id
        );

        let archive_files = files.clone();
        let archive_dest = archive_path.clone();
        tokio::task::spawn_blocking(move || write_archive(&archive_files, &archive_dest))
            .await
            .map_err(|e| DownloadError::Execution(format!("archive task failed: {}", e)))?
            .map_err(|e| DownloadError::Execution(format!("failed to build archive: {}", e)))?;

        match sink.send_document(chat_id, &archive_path).await {
            Ok(()) => {
                outcome.sent += 1;
                // The originals are gone with the archive; keeping them
                // after a successful send would just leak disk.
                for path in &files {
                    if let Err(e) = fs_err::remove_file(path) {
                        log::warn!("Failed to remove {}: {}", path.display(), e);
                    }
                }
            }
            Err(e) => {
                log::error!("Failed to send archive to chat {}: {}", chat_id, e);
                outcome.failed.push(ARCHIVE_NAME.to_string());
            }
        }

        if let Err(e) = fs_err::remove_file(&archive_path) {
            log::warn!("Failed to remove archive {}: {}", archive_path.display(), e);
        }

        return Ok(outcome);
    }

    let total = files.len();
    for (idx, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if let Err(e) = sink
            .send_text(chat_id, &format!("📤 Sending file {}/{}", idx + 1, total))
            .await
        {
            log::warn!("Failed to send progress notice to chat {}: {}", chat_id, e);
        }

        match sink.send_document(chat_id, path).await {
            Ok(()) => {
                outcome.sent += 1;
                if let Err(e) = fs_err::remove_file(path) {
                    log::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                log::error!("Failed to send {} to chat {}: {}", name, chat_id, e);
                outcome.failed.push(name);
            }
        }
    }

    Ok(outcome)
}
