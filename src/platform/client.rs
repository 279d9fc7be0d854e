//! HTTP client for the pahe.win → kwik.si resolution chain
//!
//! One client per pipeline run. Cookies are not handled by reqwest's own
//! store: the pipeline owns an explicit append-only [`CookieJar`] so that
//! exactly the cookies accumulated during resolution are replayed on the
//! final POST, in order, never deduplicated.

use crate::error::PahedlError;
use reqwest::header;
use tracing::debug;

/// Servers behind kwik reject non-browser agents, so every request
/// carries a realistic desktop UA.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A single accumulated cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Append-only cookie accumulator for one pipeline run.
///
/// Entries are kept in arrival order and never removed or deduplicated;
/// the jar is serialized to a single `Cookie` header value at submission.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one `Set-Cookie` header value and append the cookie.
    ///
    /// Only the leading `name=value` pair matters; attributes like `Path`
    /// or `Expires` are ignored.
    pub fn append_set_cookie(&mut self, header: &str) {
        let pair = header.split(';').next().unwrap_or("");
        if let Some((name, value)) = pair.split_once('=') {
            let name = name.trim();
            if !name.is_empty() {
                self.cookies.push(Cookie {
                    name: name.to_string(),
                    value: value.trim().to_string(),
                });
            }
        }
    }

    /// Join all accumulated cookies into a single `Cookie` header value.
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// HTTP client wrapper for page fetches and the final form submission.
pub struct PageClient {
    client: reqwest::Client,
}

impl PageClient {
    /// Create a client with the fixed browser User-Agent. No timeouts are
    /// configured: a hung upstream blocks the run, by accepted limitation.
    pub fn new() -> Result<Self, PahedlError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(PahedlError::FetchFailed)?;
        Ok(Self { client })
    }

    /// Fetch a page body with one GET, optionally capturing `Set-Cookie`
    /// response headers into the jar before the body is consumed.
    pub async fn fetch_page(
        &self,
        url: &str,
        jar: Option<&mut CookieJar>,
    ) -> Result<String, PahedlError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if let Some(jar) = jar {
            for value in response.headers().get_all(header::SET_COOKIE) {
                if let Ok(raw) = value.to_str() {
                    jar.append_set_cookie(raw);
                }
            }
            debug!("cookie jar now holds {} entries", jar.len());
        }

        let body = response.text().await?;
        Ok(body)
    }

    /// POST the synthesized form fields as a multipart body.
    ///
    /// Carries the accumulated cookies, the kwik page as `Referer`, and
    /// the fixed User-Agent (set client-wide). Any non-2xx status is a
    /// `SubmissionRejected`; there is no retry.
    pub async fn submit_form(
        &self,
        action: &str,
        fields: &[(String, String)],
        jar: &CookieJar,
        referer: &str,
    ) -> Result<reqwest::Response, PahedlError> {
        let mut multipart = reqwest::multipart::Form::new();
        for (name, value) in fields {
            multipart = multipart.text(name.clone(), value.clone());
        }

        debug!("POST {} ({} fields)", action, fields.len());
        let response = self
            .client
            .post(action)
            .multipart(multipart)
            .header(header::COOKIE, jar.header_value())
            .header(header::REFERER, referer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PahedlError::SubmissionRejected {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        Ok(response)
    }
}
