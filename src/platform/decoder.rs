//! Sandboxed execution of the obfuscated token script
//!
//! The kwik page ships a self-decoding script shaped like
//! `eval(function(p,a,c,k,e,d){...}(...))`, written to run its decoded
//! output immediately. Rewriting the `eval(` callsite into an assignment
//! deposits the decoded string into a runtime-owned global instead, so
//! the payload is observed rather than executed. The script itself still
//! runs inside the sandbox; the isolate has no ops registered, so it can
//! compute but cannot reach the filesystem, network, or process.

use crate::error::PahedlError;
use deno_core::{FastString, JsRuntime, RuntimeOptions};
use regex::Regex;
use tracing::debug;

/// Global the rewritten script deposits its decoded payload into.
const OUTPUT_SLOT: &str = "globalThis.__pahedl_payload";

/// Isolated decode environment for one pipeline run.
///
/// Acquired when the pipeline starts and dropped when the run ends, so no
/// interpreter state leaks across invocations. Repeated decode attempts
/// within a run reuse the isolate but overwrite the single output slot.
pub struct SandboxDecoder {
    runtime: JsRuntime,
}

impl SandboxDecoder {
    pub fn new() -> Self {
        Self {
            runtime: JsRuntime::new(RuntimeOptions::default()),
        }
    }

    /// Execute the token script and return the decoded string.
    ///
    /// A script without an `eval(` callsite, a script that throws, and a
    /// readback failure are all `DecodeFailed`; none of them crash the
    /// process.
    pub fn decode(&mut self, script: &str) -> Result<String, PahedlError> {
        if !script.contains("eval(") {
            return Err(PahedlError::DecodeFailed(
                "token script has no eval callsite".to_string(),
            ));
        }
        let rewritten = script.replacen("eval(", &format!("{} = (", OUTPUT_SLOT), 1);

        self.runtime
            .execute_script("<token>", FastString::from(rewritten))
            .map_err(|e| PahedlError::DecodeFailed(format!("script execution error: {e:?}")))?;

        let handle = self
            .runtime
            .execute_script("<readback>", FastString::from(format!("String({})", OUTPUT_SLOT)))
            .map_err(|e| PahedlError::DecodeFailed(format!("payload readback error: {e:?}")))?;

        let scope = &mut self.runtime.handle_scope();
        let payload = handle.open(scope);
        let decoded = payload.to_rust_string_lossy(scope);
        debug!("decoded {} chars from token script", decoded.len());
        Ok(decoded)
    }
}

impl Default for SandboxDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the `<form>…</form>` fragment from a decoded payload.
///
/// The match spans embedded newlines; a payload without a form means the
/// decode produced something unexpected, reported as `DecodeFailed`.
pub fn extract_form_fragment(decoded: &str) -> Result<String, PahedlError> {
    let pattern = Regex::new(r"(?s)<form.*?</form>").unwrap();
    pattern
        .find(decoded)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| PahedlError::DecodeFailed("decoded payload contains no form".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_intercepts_eval() {
        let script = r#"eval(function(s){return '<form action="/d/token1">' + s + '</form>';}('<input name="id" value="42">'))"#;

        let mut decoder = SandboxDecoder::new();
        let decoded = decoder.decode(script).unwrap();
        assert_eq!(
            decoded,
            r#"<form action="/d/token1"><input name="id" value="42"></form>"#
        );
    }

    #[test]
    fn test_decode_reuses_isolate_within_run() {
        let mut decoder = SandboxDecoder::new();
        let first = decoder.decode("eval('first')").unwrap();
        assert_eq!(first, "first");
        // Second attempt overwrites the single output slot
        let second = decoder.decode("eval('second')").unwrap();
        assert_eq!(second, "second");
    }

    #[test]
    fn test_decode_without_eval_callsite() {
        let mut decoder = SandboxDecoder::new();
        assert!(matches!(
            decoder.decode("var x = 1;"),
            Err(PahedlError::DecodeFailed(_))
        ));
    }

    #[test]
    fn test_decode_of_throwing_script() {
        let mut decoder = SandboxDecoder::new();
        assert!(matches!(
            decoder.decode("eval(undefinedFunction())"),
            Err(PahedlError::DecodeFailed(_))
        ));
    }

    #[test]
    fn test_extract_form_fragment_spans_newlines() {
        let decoded = "prefix\n<form action=\"/d/t\">\n<input name=\"a\">\n</form>\nsuffix";
        let fragment = extract_form_fragment(decoded).unwrap();
        assert!(fragment.starts_with("<form"));
        assert!(fragment.ends_with("</form>"));
        assert!(fragment.contains("name=\"a\""));
    }

    #[test]
    fn test_extract_form_fragment_missing() {
        assert!(matches!(
            extract_form_fragment("no markup here"),
            Err(PahedlError::DecodeFailed(_))
        ));
    }
}
