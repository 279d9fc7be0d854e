//! Site-coupled layer: fetching, extraction, decoding, form synthesis
//!
//! All string-pattern coupling to upstream markup lives in this module's
//! extractors, so adapting to site changes touches nothing else.

pub mod client;
pub mod decoder;
pub mod form;
pub mod redirect;
pub mod token;

pub use client::{CookieJar, PageClient};
pub use decoder::SandboxDecoder;
pub use form::SynthesizedForm;
