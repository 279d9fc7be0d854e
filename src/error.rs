//! Error types for pahedl

use thiserror::Error;

/// Main error type for pipeline operations.
///
/// Every variant is fatal to the run and non-fatal to the process: the
/// binary reports the failing stage and exits cleanly instead of panicking.
#[derive(Debug, Error)]
pub enum PahedlError {
    #[error("Invalid input URL: {0}")]
    InvalidInput(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] reqwest::Error),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    #[error("Submission rejected: {status} {reason}")]
    SubmissionRejected { status: u16, reason: String },

    #[error("Write failed: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl PahedlError {
    /// Short identifier for the stage that failed, for console reporting.
    pub fn stage(&self) -> &'static str {
        match self {
            PahedlError::InvalidInput(_) | PahedlError::UrlError(_) => "invalid-input",
            PahedlError::FetchFailed(_) => "fetch",
            PahedlError::ExtractionFailed(_) => "extraction",
            PahedlError::DecodeFailed(_) => "decode",
            PahedlError::SubmissionRejected { .. } => "submission",
            PahedlError::WriteFailed(_) => "write",
        }
    }
}
