//! Input URL validation for pahe.win landing pages

use crate::error::PahedlError;
use url::Url;

/// Host every valid landing page lives under.
pub const LANDING_HOST: &str = "pahe.win";

/// Components of a validated landing-page URL.
///
/// Derived once by [`validate_landing_url`] and used only for validation
/// and logging; the pipeline keeps fetching by the raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    pub scheme: String,
    pub host: String,
    /// The single path segment identifying the landing page.
    pub slug: String,
}

/// Validate a raw input string as a pahe.win landing-page URL.
///
/// Requires an absolute `http`/`https` URL (scheme case-insensitive, which
/// `Url::parse` normalizes) with host `pahe.win` and exactly one non-empty
/// path segment. Anything else is `InvalidInput`; no network activity has
/// happened yet when this rejects.
pub fn validate_landing_url(raw: &str) -> Result<ValidatedUrl, PahedlError> {
    let parsed =
        Url::parse(raw).map_err(|e| PahedlError::InvalidInput(format!("{}: {}", raw, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PahedlError::InvalidInput(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )));
    }

    if parsed.host_str() != Some(LANDING_HOST) {
        return Err(PahedlError::InvalidInput(format!(
            "host must be {}: {}",
            LANDING_HOST, raw
        )));
    }

    let mut segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();
    // A trailing slash yields one empty trailing segment
    if segments.last() == Some(&"") {
        segments.pop();
    }

    match segments.as_slice() {
        [slug] if !slug.is_empty() => Ok(ValidatedUrl {
            scheme: parsed.scheme().to_string(),
            host: LANDING_HOST.to_string(),
            slug: (*slug).to_string(),
        }),
        _ => Err(PahedlError::InvalidInput(format!(
            "expected a single path segment: {}",
            raw
        ))),
    }
}
