//! Form synthesis from the decoded payload

use crate::error::PahedlError;
use scraper::{Html, Selector};
use url::Url;

/// A download form reconstructed from the decoded payload.
///
/// Built once per run and consumed once by the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedForm {
    /// The form's `action` as written, or the kwik page URL when the form
    /// omits one (self-submission). May be relative; resolve with
    /// [`resolve_action`] before posting.
    pub action: String,
    /// Field name/value pairs in document order.
    pub fields: Vec<(String, String)>,
}

/// Build a [`SynthesizedForm`] from a form HTML fragment.
///
/// `page_url` is the kwik page the fragment came from; it stands in for a
/// missing or empty `action` attribute. Every `input`, `select`, and
/// `textarea` descendant with a non-empty `name` contributes a field in
/// document order, with an empty value when the `value` attribute is
/// absent. Unnamed controls are skipped without signal: they carry no
/// semantic key.
pub fn synthesize_form(fragment: &str, page_url: &str) -> Result<SynthesizedForm, PahedlError> {
    let document = Html::parse_fragment(fragment);
    let form_selector = Selector::parse("form").unwrap();
    let form = document.select(&form_selector).next().ok_or_else(|| {
        PahedlError::ExtractionFailed("no form found in decoded payload".to_string())
    })?;

    let action = match form.value().attr("action") {
        Some(action) if !action.is_empty() => action.to_string(),
        _ => page_url.to_string(),
    };

    let field_selector = Selector::parse("input, select, textarea").unwrap();
    let mut fields = Vec::new();
    for control in form.select(&field_selector) {
        if let Some(name) = control.value().attr("name") {
            if !name.is_empty() {
                let value = control.value().attr("value").unwrap_or("").to_string();
                fields.push((name.to_string(), value));
            }
        }
    }

    Ok(SynthesizedForm { action, fields })
}

/// Resolve a possibly-relative form action against the kwik page URL.
pub fn resolve_action(action: &str, page_url: &str) -> Result<String, PahedlError> {
    let base = Url::parse(page_url)?;
    Ok(base.join(action)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://kwik.si/f/xyz123";

    #[test]
    fn test_synthesizes_action_and_fields() {
        let fragment = r#"<form action="/d/token1"><input name="id" value="42"></form>"#;
        let form = synthesize_form(fragment, PAGE_URL).unwrap();
        assert_eq!(form.action, "/d/token1");
        assert_eq!(form.fields, vec![("id".to_string(), "42".to_string())]);
    }

    #[test]
    fn test_missing_action_falls_back_to_page_url() {
        let fragment = r#"<form><input name="_token" value="t"></form>"#;
        let form = synthesize_form(fragment, PAGE_URL).unwrap();
        assert_eq!(form.action, PAGE_URL);
    }

    #[test]
    fn test_field_order_is_document_order() {
        let fragment = r#"<form action="/d/t">
            <input name="first" value="1">
            <select name="second"></select>
            <textarea name="third"></textarea>
            <input name="fourth">
        </form>"#;
        let form = synthesize_form(fragment, PAGE_URL).unwrap();
        let names: Vec<&str> = form.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third", "fourth"]);
        // Controls without a value attribute contribute empty strings
        assert_eq!(form.fields[1].1, "");
        assert_eq!(form.fields[3].1, "");
    }

    #[test]
    fn test_unnamed_fields_are_skipped() {
        let fragment = r#"<form action="/d/t">
            <input value="no name">
            <input name="" value="empty name">
            <input name="kept" value="v">
        </form>"#;
        let form = synthesize_form(fragment, PAGE_URL).unwrap();
        assert_eq!(form.fields, vec![("kept".to_string(), "v".to_string())]);
    }

    #[test]
    fn test_no_form_in_fragment() {
        assert!(matches!(
            synthesize_form("<div>not a form</div>", PAGE_URL),
            Err(PahedlError::ExtractionFailed(_))
        ));
    }

    #[test]
    fn test_resolve_action() {
        assert_eq!(
            resolve_action("/d/token1", PAGE_URL).unwrap(),
            "https://kwik.si/d/token1"
        );
        assert_eq!(
            resolve_action("https://files.kwik.si/dl", PAGE_URL).unwrap(),
            "https://files.kwik.si/dl"
        );
    }
}
