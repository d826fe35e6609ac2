//! Seam between command handlers and the embedding editor.
//!
//! Handlers never talk to a concrete editor; they go through [`EditorHost`],
//! which an embedding (or a test fake) implements with its native facilities:
//! cursor lookup, edit application, virtual-document plumbing.

use std::{error::Error as StdError, fmt};

use async_lsp::lsp_types::{Position, TextEdit, Url};

/// The focused editor, if its document is one this extension handles.
///
/// Hosts filter here: a `None` from [`EditorHost::active_editor`] means
/// either no editor is focused or the focused document is not relevant, and
/// handlers fall through to default behavior without touching the wire.
#[derive(Debug, Clone)]
pub struct ActiveEditor {
    pub uri: Url,
    pub cursor: Position,
}

/// Token for a registered content provider. Returned at registration,
/// surrendered exactly once at release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderHandle(pub u64);

/// Failures inside the editor host itself.
///
/// Unlike protocol failures these are not absorbed by fallback paths; a host
/// that cannot apply an edit or register a provider is a defect state and
/// the error propagates to the caller.
#[derive(Debug, Clone)]
pub enum HostError {
    UnknownDocument(String),
    EditRejected(String),
    RegistrationFailed(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDocument(uri) => write!(f, "Unknown document: {uri}"),
            Self::EditRejected(msg) => write!(f, "Edit rejected by host: {msg}"),
            Self::RegistrationFailed(msg) => write!(f, "Provider registration failed: {msg}"),
        }
    }
}

impl StdError for HostError {}

/// Editor facilities the command handlers consume.
pub trait EditorHost {
    /// Focused editor showing a relevant document, if any.
    fn active_editor(&self) -> Option<ActiveEditor>;

    /// Apply text edits to the given document.
    fn apply_edits(&mut self, uri: &Url, edits: &[TextEdit]) -> Result<(), HostError>;

    /// The editor's built-in newline insertion at the cursor.
    fn insert_newline(&mut self) -> Result<(), HostError>;

    /// Open or focus the document at `uri`.
    fn show_document(&mut self, uri: &Url) -> Result<(), HostError>;

    /// Register a content provider for a custom URI scheme.
    fn register_provider(&mut self, scheme: &str) -> Result<ProviderHandle, HostError>;

    /// Release a previously registered provider.
    fn release_provider(&mut self, handle: ProviderHandle);

    /// Signal that a virtual document's content changed and should be
    /// re-rendered.
    fn emit_changed(&mut self, uri: &Url);
}
