//! The linear resolution pipeline
//!
//! Each stage's output is the next stage's input and every stage failure
//! ends the run: validate → fetch landing page → extract redirect →
//! fetch kwik page (capturing cookies) → locate token script → sandboxed
//! decode → synthesize form → authenticated POST → streamed write. There
//! is exactly one HTTP request in flight at any time and no stage is
//! retried.

use crate::core::progress::Progress;
use crate::download::writer::{self, DownloadOutcome};
use crate::error::PahedlError;
use crate::platform::client::{CookieJar, PageClient};
use crate::platform::decoder::{self, SandboxDecoder};
use crate::platform::form::{self, SynthesizedForm};
use crate::platform::{redirect, token};
use crate::utils::url::validate_landing_url;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// One-shot resolver and downloader for a pahe.win landing page.
pub struct Pipeline {
    client: PageClient,
    output_dir: PathBuf,
    progress_callback: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl Pipeline {
    pub fn new() -> Result<Self, PahedlError> {
        Ok(Self {
            client: PageClient::new()?,
            output_dir: PathBuf::from("."),
            progress_callback: None,
        })
    }

    /// Set the directory the downloaded file lands in.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set a progress callback invoked after every drained chunk.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Walk the extraction stages and return the synthesized form, the
    /// cookies accumulated along the way, and the kwik page URL.
    async fn resolve(
        &self,
        raw_url: &str,
    ) -> Result<(SynthesizedForm, CookieJar, String), PahedlError> {
        let validated = validate_landing_url(raw_url)?;
        info!("resolving {}/{}", validated.host, validated.slug);

        // Decode sandbox is scoped to this run: acquired up front,
        // released when the run ends
        let mut sandbox = SandboxDecoder::new();

        // Cookies set by the landing page are not captured; only the
        // kwik fetch feeds the jar
        let landing_body = self.client.fetch_page(raw_url, None).await?;
        let kwik_url = redirect::extract_redirect_url(&landing_body)?;
        info!("redirect target: {}", kwik_url);

        let mut jar = CookieJar::new();
        let kwik_body = self.client.fetch_page(&kwik_url, Some(&mut jar)).await?;
        let token_script = token::locate_token_script(&kwik_body)?;

        let decoded = sandbox.decode(&token_script)?;
        let fragment = decoder::extract_form_fragment(&decoded)?;
        let synthesized = form::synthesize_form(&fragment, &kwik_url)?;
        debug!(
            "synthesized form: action {} with {} fields",
            synthesized.action,
            synthesized.fields.len()
        );

        Ok((synthesized, jar, kwik_url))
    }

    /// Resolve the pipeline up to the form and return the absolute action
    /// URL without submitting anything.
    pub async fn resolve_action_url(&self, raw_url: &str) -> Result<String, PahedlError> {
        let (synthesized, _jar, kwik_url) = self.resolve(raw_url).await?;
        form::resolve_action(&synthesized.action, &kwik_url)
    }

    /// Run the full pipeline: resolve, submit, stream to disk.
    pub async fn run(&self, raw_url: &str) -> Result<DownloadOutcome, PahedlError> {
        let (synthesized, jar, kwik_url) = self.resolve(raw_url).await?;

        let action = form::resolve_action(&synthesized.action, &kwik_url)?;
        let response = self
            .client
            .submit_form(&action, &synthesized.fields, &jar, &kwik_url)
            .await?;

        let outcome = writer::download_response(
            response,
            &self.output_dir,
            self.progress_callback.as_deref(),
        )
        .await?;
        info!(
            "downloaded {} ({} bytes)",
            outcome.target.filename, outcome.bytes_written
        );
        Ok(outcome)
    }
}
