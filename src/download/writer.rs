//! Streaming file writer with backpressure
//!
//! The response stream is the producer and the destination file is the
//! consumer. The loop never requests the next chunk while the previous
//! write is still draining: the await on the write future is the drain
//! signal, so at most one unacknowledged write is ever outstanding and a
//! fast network cannot buffer ahead of a slow disk.

use crate::core::progress::Progress;
use crate::error::PahedlError;
use crate::utils::{filename, mime};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_LENGTH};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use url::Url;

/// Progress observer invoked after every drained chunk.
pub type ProgressFn = dyn Fn(&Progress) + Send + Sync;

/// What the response resolved to on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub filename: String,
    pub mime_type: String,
    /// Expected size from `Content-Length`, when present
    pub size_bytes: Option<u64>,
}

impl DownloadTarget {
    /// Derive the target from the final response headers and URL.
    ///
    /// Filename fallbacks in priority order: `Content-Disposition`
    /// filename, the `file` query parameter of the final URL, then a
    /// generated extension-less name.
    pub fn derive(headers: &HeaderMap, final_url: &Url) -> Self {
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename::from_content_disposition)
            .or_else(|| filename::from_file_query(final_url))
            .map(|name| filename::to_safe_filename(&name))
            .unwrap_or_else(filename::generated);

        let mime_type = mime::mime_for_filename(&filename).to_string();

        let size_bytes = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        Self {
            filename,
            mime_type,
            size_bytes,
        }
    }
}

/// Result of a completed streaming write.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub target: DownloadTarget,
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Copy a chunk stream into the destination one chunk at a time.
///
/// Returns the cumulative byte count, which equals the sum of all chunk
/// lengths the producer delivered. Any write error terminates the loop
/// immediately; the producer is never read again after a failure.
pub async fn stream_to_writer<S, E, W>(
    mut stream: S,
    dest: &mut W,
    mut on_chunk: impl FnMut(u64),
) -> Result<u64, PahedlError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<PahedlError>,
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        // write_all resolves only once the destination has drained the
        // whole chunk; suspending here is the backpressure wait
        dest.write_all(&chunk).await?;
        written += chunk.len() as u64;
        on_chunk(written);
    }

    dest.flush().await?;
    Ok(written)
}

/// Stream the final response body to `output_dir/<derived filename>`.
///
/// The file is created (or truncated) directly at the derived name; no
/// directories are created. A failed write aborts and removes the partial
/// file.
pub async fn download_response(
    response: reqwest::Response,
    output_dir: &Path,
    progress: Option<&ProgressFn>,
) -> Result<DownloadOutcome, PahedlError> {
    let target = DownloadTarget::derive(response.headers(), response.url());
    let path = output_dir.join(&target.filename);
    info!(
        "writing {} ({}, {} expected)",
        path.display(),
        target.mime_type,
        target
            .size_bytes
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown size".to_string())
    );

    let mut file = File::create(&path).await?;
    let mut tracker = Progress::new(target.size_bytes);
    let stream = response.bytes_stream();

    let result = stream_to_writer(stream, &mut file, |written| {
        tracker.update(written);
        if let Some(cb) = progress {
            cb(&tracker);
        }
    })
    .await;

    match result {
        Ok(bytes_written) => {
            debug!("write complete: {} bytes", bytes_written);
            Ok(DownloadOutcome {
                target,
                path,
                bytes_written,
            })
        }
        Err(e) => {
            warn!("streaming write aborted: {}", e);
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            Err(e)
        }
    }
}
