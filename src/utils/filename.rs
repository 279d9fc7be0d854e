//! Filename derivation for downloaded files
//!
//! Three strategies in priority order: the `Content-Disposition` response
//! header, the `file` query parameter of the final response URL, and a
//! generated fallback name with no extension.

use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use url::Url;

/// Fixed tag prefixed to generated fallback filenames.
pub const PRODUCT_TAG: &str = "pahedl";

const GENERATED_SUFFIX_LEN: usize = 8;

/// Pull a filename out of a `Content-Disposition` header value.
pub fn from_content_disposition(header: &str) -> Option<String> {
    let pattern = Regex::new(r#"filename="?([^";]+)"?"#).unwrap();
    pattern
        .captures(header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Pull a filename from the `file` query parameter of the final URL.
pub fn from_file_query(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "file")
        .map(|(_, value)| value.to_string())
        .filter(|name| !name.is_empty())
}

/// Generate a fallback filename: the product tag plus a random short
/// identifier, deliberately extension-less.
pub fn generated() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}_{}", PRODUCT_TAG, suffix)
}

/// Convert a derived name to a safe filename by replacing invalid
/// characters and trimming filesystem-hostile edges.
pub fn to_safe_filename(name: &str) -> String {
    let invalid_chars = Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).unwrap();
    let mut safe = invalid_chars.replace_all(name, "_").to_string();

    safe = safe
        .trim_matches(|c: char| c == '.' || c == ' ')
        .to_string();

    // Windows caps paths at 255 chars, be conservative
    if safe.len() > 200 {
        safe.truncate(200);
        safe = safe.trim_end().to_string();
    }

    if safe.is_empty() {
        return generated();
    }

    safe
}

/// Extension of a filename, without the dot, lowercased.
pub fn extension(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_disposition() {
        assert_eq!(
            from_content_disposition(r#"attachment; filename="episode 01.mp4""#),
            Some("episode 01.mp4".to_string())
        );
        assert_eq!(
            from_content_disposition("attachment; filename=plain.mkv"),
            Some("plain.mkv".to_string())
        );
        assert_eq!(from_content_disposition("attachment"), None);
        assert_eq!(from_content_disposition(r#"filename="""#), None);
    }

    #[test]
    fn test_from_file_query() {
        let url = Url::parse("https://eu-1.files.example/dl?file=show.mp4&token=x").unwrap();
        assert_eq!(from_file_query(&url), Some("show.mp4".to_string()));

        let url = Url::parse("https://eu-1.files.example/dl?token=x").unwrap();
        assert_eq!(from_file_query(&url), None);
    }

    #[test]
    fn test_generated_is_unique_and_extension_less() {
        let a = generated();
        let b = generated();
        assert_ne!(a, b);

        let pattern = Regex::new(&format!(r"^{}_[A-Za-z0-9]{{8}}$", PRODUCT_TAG)).unwrap();
        assert!(pattern.is_match(&a), "unexpected generated name: {}", a);
        assert!(pattern.is_match(&b), "unexpected generated name: {}", b);
        assert_eq!(extension(&a), None);
    }

    #[test]
    fn test_to_safe_filename() {
        assert_eq!(to_safe_filename("a<b>c:d.mp4"), "a_b_c_d.mp4");
        assert_eq!(to_safe_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(to_safe_filename("normal name.mkv"), "normal name.mkv");
        // Degenerate names fall through to the generated pattern
        assert!(to_safe_filename("...").starts_with(PRODUCT_TAG));
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("a.MP4"), Some("mp4".to_string()));
        assert_eq!(extension("noext"), None);
    }
}
