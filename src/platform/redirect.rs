//! Redirect-link extraction from the pahe.win landing page
//!
//! The landing page hides the kwik URL inside its first inline script.
//! This coupling to upstream markup is deliberately confined here: if the
//! landing page changes shape, only this module needs to follow.

use crate::error::PahedlError;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

/// Host the landing page redirects to.
pub const REDIRECT_HOST: &str = "kwik.si";

/// Extract the kwik file-page URL from the landing page HTML.
///
/// Takes the first `<script type="text/javascript">` without a `src`
/// attribute and pattern-matches an absolute URL under [`REDIRECT_HOST`].
/// A missing script and a script without such a URL are both
/// `ExtractionFailed`, reported, not thrown.
pub fn extract_redirect_url(html: &str) -> Result<String, PahedlError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[type="text/javascript"]"#).unwrap();

    let script = document
        .select(&selector)
        .find(|el| el.value().attr("src").is_none())
        .ok_or_else(|| {
            PahedlError::ExtractionFailed("no inline script on landing page".to_string())
        })?;
    let text: String = script.text().collect();

    let pattern = Regex::new(&format!(
        r"https?://{}/f/[A-Za-z0-9_-]+",
        regex::escape(REDIRECT_HOST)
    ))
    .unwrap();

    match pattern.find(&text) {
        Some(m) => {
            debug!("redirect target found: {}", m.as_str());
            Ok(m.as_str().to_string())
        }
        None => Err(PahedlError::ExtractionFailed(format!(
            "inline script contains no {} link",
            REDIRECT_HOST
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_kwik_url_from_inline_script() {
        let html = r#"<html><head></head><body>
            <script type="text/javascript" src="/static/app.js"></script>
            <script type="text/javascript">
                setTimeout(function () {
                    window.location.href = 'https://kwik.si/f/xyz123';
                }, 3000);
            </script>
        </body></html>"#;

        assert_eq!(
            extract_redirect_url(html).unwrap(),
            "https://kwik.si/f/xyz123"
        );
    }

    #[test]
    fn test_no_inline_script() {
        let html = r#"<html><body>
            <script type="text/javascript" src="/static/app.js"></script>
        </body></html>"#;

        assert!(matches!(
            extract_redirect_url(html),
            Err(PahedlError::ExtractionFailed(_))
        ));
    }

    #[test]
    fn test_inline_script_without_link() {
        let html = r#"<html><body>
            <script type="text/javascript">console.log('nothing here');</script>
        </body></html>"#;

        assert!(matches!(
            extract_redirect_url(html),
            Err(PahedlError::ExtractionFailed(_))
        ));
    }

    #[test]
    fn test_only_first_inline_script_is_considered() {
        // Links in later scripts must not rescue a first script without one
        let html = r#"<html><body>
            <script type="text/javascript">var noise = 1;</script>
            <script type="text/javascript">location = 'https://kwik.si/f/later';</script>
        </body></html>"#;

        assert!(extract_redirect_url(html).is_err());
    }
}
