//! Standalone companion client for rust-analyzer's LSP extensions.
//!
//! rust-analyzer speaks stock LSP plus a set of custom methods; this crate
//! is the client side of those extensions, independent of any particular
//! editor:
//!
//! - [`lsp_ext`] — the typed method catalog (the wire contract)
//! - [`client`] — a spawned-server connection with typed sends
//! - [`editor`] + [`commands`] — editor command handlers behind a host trait
//! - [`test_explorer`] — state fed by the server's test-run notifications
//! - [`runnables`] — resolving server-described runnables to command lines

pub mod client;
pub mod commands;
pub mod editor;
pub mod error;
pub mod lsp_ext;
pub mod runnables;
pub mod test_explorer;
