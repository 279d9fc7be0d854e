//! Token script location on the kwik file page
//!
//! The obfuscated payload is recognizable by the base64 alphabet literal
//! its packer routine embeds. The alphabet is a structural signature of
//! the obfuscator, not a decoded value.

use crate::error::PahedlError;
use scraper::{Html, Selector};
use tracing::debug;

/// Marker substring identifying the obfuscated token script.
pub const BASE64_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Find the obfuscated token script among the body's direct `<script>`
/// children and return its text.
///
/// Head-level and nested scripts are not searched; the payload is always
/// a top-level body script.
pub fn locate_token_script(html: &str) -> Result<String, PahedlError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("body > script").unwrap();

    for script in document.select(&selector) {
        let text: String = script.text().collect();
        if text.contains(BASE64_ALPHABET) {
            debug!("token script located ({} chars)", text.len());
            return Ok(text);
        }
    }

    Err(PahedlError::ExtractionFailed(
        "no token script on kwik page".to_string(),
    ))
}
