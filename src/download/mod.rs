//! Streamed file download

pub mod writer;

pub use writer::{DownloadOutcome, DownloadTarget};
