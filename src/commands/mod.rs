//! Editor command handlers.
//!
//! Each handler is one short-lived invocation: read editor context, send at
//! most one request, then either apply the result or fall back to the
//! editor's default behavior. Protocol failures are absorbed here and turned
//! into the fallback; only host failures propagate.

mod on_enter;
mod status_view;

pub use on_enter::on_enter;
pub use status_view::{status_uri, StatusView, STATUS_SCHEME};

/// Terminal state of one handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server produced a usable result and it was applied.
    Applied,
    /// The editor's default behavior ran instead.
    Fallback,
}
