//! The analyzer-status virtual document.
//!
//! A read-only document at a fixed pseudo-location. Its content provider is
//! registered with the host once, on first open, and the registration is
//! surrendered exactly once at session teardown. Rendering the document
//! performs one status round trip, scoped to the active relevant document.

use async_lsp::lsp_types::{TextDocumentIdentifier, Url};

use crate::{
    client::AnalyzerTransport,
    editor::{EditorHost, HostError, ProviderHandle},
    lsp_ext::{AnalyzerStatus, AnalyzerStatusParams},
};

/// Scheme the status document lives under.
pub const STATUS_SCHEME: &str = "ra-companion-status";

/// Fixed pseudo-location of the status document.
pub fn status_uri() -> Url {
    Url::parse("ra-companion-status://status/status.md").expect("static status URI parses")
}

/// Session-scoped state of the status view.
#[derive(Debug, Default)]
pub struct StatusView {
    registration: Option<ProviderHandle>,
}

impl StatusView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or refocus) the status document and force a re-render.
    ///
    /// Registers the content provider on first use; later opens reuse the
    /// registration.
    pub fn open<H: EditorHost>(&mut self, host: &mut H) -> Result<(), HostError> {
        if self.registration.is_none() {
            self.registration = Some(host.register_provider(STATUS_SCHEME)?);
        }

        let uri = status_uri();
        host.show_document(&uri)?;
        host.emit_changed(&uri);
        Ok(())
    }

    /// Render the document body.
    ///
    /// Called by the host whenever the document needs content. The request
    /// is scoped to the active relevant document when there is one; the
    /// returned string is the body verbatim. A failed request renders an
    /// empty body.
    pub async fn render<T, H>(&self, transport: &T, host: &H) -> String
    where
        T: AnalyzerTransport,
        H: EditorHost,
    {
        let params = AnalyzerStatusParams {
            text_document: host
                .active_editor()
                .map(|editor| TextDocumentIdentifier { uri: editor.uri }),
        };

        match transport.request::<AnalyzerStatus>(params).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("analyzerStatus request failed: {e}");
                String::new()
            }
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    /// Release the provider registration.
    ///
    /// Invoked at session teardown. Idempotent: the handle is surrendered at
    /// most once, further calls are no-ops.
    pub fn dispose<H: EditorHost>(&mut self, host: &mut H) {
        if let Some(handle) = self.registration.take() {
            host.release_provider(handle);
        }
    }
}
