//! # pahedl - pahe.win downloader
//!
//! Resolves a pahe.win landing page into a directly downloadable file and
//! streams it to local storage.
//!
//! The resolution pipeline is strictly linear: fetch the landing page,
//! extract the kwik.si redirect from its inline script, fetch the kwik
//! page while accumulating its cookies, locate the obfuscated token
//! script, decode it inside an isolated JavaScript sandbox, rebuild the
//! hidden download form, POST it with the accumulated cookies, then
//! stream the response body to disk with backpressure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pahedl::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new()?.with_output_dir("./downloads");
//!     let outcome = pipeline.run("https://pahe.win/ABCDE").await?;
//!     println!("Saved {} ({} bytes)", outcome.target.filename, outcome.bytes_written);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod download;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use crate::core::{Pipeline, Progress};
pub use crate::download::{DownloadOutcome, DownloadTarget};
pub use crate::error::PahedlError;

/// Result type alias for pahedl operations
pub type Result<T> = std::result::Result<T, PahedlError>;
