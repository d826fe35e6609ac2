use async_lsp::lsp_types::{TextDocumentIdentifier, TextDocumentPositionParams};

use super::Outcome;
use crate::{
    client::AnalyzerTransport,
    editor::{EditorHost, HostError},
    lsp_ext::OnEnter,
};

/// Smart-Enter: ask the server what Enter should do at the cursor.
///
/// Exactly one of two effects happens per invocation: the server's edits are
/// applied, or the default newline is inserted. A failed or empty response
/// selects the newline; the failure reason is logged, never surfaced.
pub async fn on_enter<T, H>(transport: &T, host: &mut H) -> Result<Outcome, HostError>
where
    T: AnalyzerTransport,
    H: EditorHost,
{
    let Some(editor) = host.active_editor() else {
        tracing::trace!("onEnter: no active editor");
        host.insert_newline()?;
        return Ok(Outcome::Fallback);
    };

    let params = TextDocumentPositionParams {
        text_document: TextDocumentIdentifier {
            uri: editor.uri.clone(),
        },
        position: editor.cursor,
    };

    let edits = match transport.request::<OnEnter>(params).await {
        Ok(Some(edits)) if !edits.is_empty() => edits,
        Ok(_) => {
            tracing::debug!("onEnter: empty result, falling back to newline");
            host.insert_newline()?;
            return Ok(Outcome::Fallback);
        }
        Err(e) => {
            tracing::debug!("onEnter request failed: {e}");
            host.insert_newline()?;
            return Ok(Outcome::Fallback);
        }
    };

    host.apply_edits(&editor.uri, &edits)?;
    Ok(Outcome::Applied)
}
