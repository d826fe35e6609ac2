//! Client side of the analyzer connection.
//!
//! Spawns a rust-analyzer process over stdio, runs the LSP main loop on a
//! background task, and exposes typed sends keyed by the catalog types in
//! [`crate::lsp_ext`]. Server-to-client notifications come back out as a
//! stream of [`ServerEvent`]s.

use std::{
    collections::HashMap,
    env,
    fs::{self, File},
    future::Future,
    ops::ControlFlow,
    process::Stdio,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use async_lsp::{
    lsp_types::{
        notification::{DidChangeTextDocument, DidOpenTextDocument, Initialized, Notification},
        request::{Initialize, Request},
        DidChangeTextDocumentParams, DidOpenTextDocumentParams, InitializeParams,
        InitializedParams, Url,
    },
    AnyEvent, AnyNotification, AnyRequest, LspService, MainLoop, ResponseError, ServerSocket,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tokio::{
    process::{ChildStdin, ChildStdout, Command},
    sync::{mpsc, RwLock},
};
use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};
use tower_service::Service;

use crate::{
    error::LspError,
    lsp_ext::{
        AppendOutputToRunTest, ChangeTestState, ChangeTestStateParams, DiscoverTestResults,
        DiscoveredTests, EndRunTest, OpenServerLogs, ServerStatus, ServerStatusParams,
    },
};

/// Typed access to the analyzer connection.
///
/// The seam between command handlers and the wire: handlers are generic over
/// this so tests can substitute a canned transport. Every request may fail;
/// callers treat failure as "operation unavailable now", not as fatal.
pub trait AnalyzerTransport {
    /// Send one request and await its single reply.
    fn request<R: Request>(
        &self,
        params: R::Params,
    ) -> impl Future<Output = Result<R::Result, LspError>>;

    /// Send a fire-and-forget notification. Delivery is not acknowledged.
    fn notify<N: Notification>(&self, params: N::Params) -> Result<(), LspError>;
}

/// A server-to-client notification, parsed and ready to apply.
///
/// Each event is independently applicable, keyed by the identifiers it
/// carries; consumers must not assume ordering relative to their own
/// requests.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    Status(ServerStatusParams),
    DiscoveredTests(DiscoverTestResults),
    TestState(ChangeTestStateParams),
    TestOutput(String),
    TestRunEnded,
    OpenServerLogs,
}

/// Inbound half of the connection: answers server-to-client requests with
/// null and turns known notifications into [`ServerEvent`]s.
pub struct CompanionService {
    events: mpsc::UnboundedSender<ServerEvent>,
}

impl CompanionService {
    pub fn new(events: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { events }
    }

    fn forward<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
        wrap: impl FnOnce(T) -> ServerEvent,
    ) {
        match serde_json::from_value::<T>(params) {
            Ok(parsed) => {
                let _ = self.events.send(wrap(parsed));
            }
            Err(e) => tracing::debug!("Malformed {method} notification: {e}"),
        }
    }

    fn dispatch(&self, notif: AnyNotification) {
        let AnyNotification { method, params, .. } = notif;
        match method.as_str() {
            m if m == ServerStatus::METHOD => self.forward(m, params, ServerEvent::Status),
            m if m == DiscoveredTests::METHOD => {
                self.forward(m, params, ServerEvent::DiscoveredTests);
            }
            m if m == ChangeTestState::METHOD => self.forward(m, params, ServerEvent::TestState),
            m if m == AppendOutputToRunTest::METHOD => {
                self.forward(m, params, ServerEvent::TestOutput);
            }
            m if m == EndRunTest::METHOD => {
                let _ = self.events.send(ServerEvent::TestRunEnded);
            }
            m if m == OpenServerLogs::METHOD => {
                let _ = self.events.send(ServerEvent::OpenServerLogs);
            }
            "textDocument/publishDiagnostics" => {
                tracing::debug!("publishDiagnostics received");
            }
            other => tracing::debug!("Unhandled notification: {other}"),
        }
    }
}

impl Service<AnyRequest> for CompanionService {
    type Response = serde_json::Value;
    type Error = ResponseError;
    type Future = std::pin::Pin<
        Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: AnyRequest) -> Self::Future {
        Box::pin(async { Ok(serde_json::Value::Null) })
    }
}

impl LspService for CompanionService {
    fn notify(&mut self, notif: AnyNotification) -> ControlFlow<async_lsp::Result<()>> {
        self.dispatch(notif);
        ControlFlow::Continue(())
    }

    fn emit(&mut self, _event: AnyEvent) -> ControlFlow<async_lsp::Result<()>> {
        ControlFlow::Continue(())
    }
}

/// Per-document state tracked by the client.
pub struct DocumentState {
    pub version: u32,
}

/// Client for one spawned rust-analyzer process.
pub struct AnalyzerClient {
    socket: ServerSocket,
    documents: RwLock<HashMap<String, DocumentState>>,
    next_id: AtomicI64,
}

impl AnalyzerClient {
    /// Spawn the server and run the LSP main loop on a background task.
    ///
    /// Returns the client plus the stream of parsed server events.
    pub fn spawn(
        program: &str,
        extra_args: &[String],
    ) -> Result<(Arc<Self>, mpsc::UnboundedReceiver<ServerEvent>), LspError> {
        tracing::info!("[analyzer] Starting {program}");

        let (stdin, stdout) = spawn_server(program, extra_args)?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (mainloop, socket) = MainLoop::new_client(move |_| CompanionService::new(events_tx));

        tokio::spawn(async move {
            if let Err(e) = mainloop
                .run_buffered(stdout.compat(), stdin.compat_write())
                .await
            {
                tracing::error!("[analyzer] MainLoop error: {e:?}");
            }
        });

        let client = Arc::new(Self {
            socket,
            documents: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        });

        Ok((client, events_rx))
    }

    /// Perform the LSP handshake, rooted at the current working directory.
    pub async fn initialize(&self) -> Result<(), LspError> {
        let cwd = env::current_dir().map_err(|e| LspError::RpcError {
            code: None,
            message: format!("Cannot determine working directory: {e}"),
        })?;

        let root_uri = Url::from_file_path(&cwd).map_err(|_| LspError::RpcError {
            code: None,
            message: format!("Invalid project path: {}", cwd.display()),
        })?;

        #[allow(deprecated)]
        let params = InitializeParams {
            root_uri: Some(root_uri),
            capabilities: Default::default(),
            ..Default::default()
        };

        tracing::debug!("[analyzer] Sending initialize request");

        let id = self.next_request_id();
        let request_json = json!({ "id": id, "method": Initialize::METHOD, "params": params });
        let request: AnyRequest = serde_json::from_value(request_json).map_err(|e| {
            LspError::InvalidRequest(format!("Failed to build initialize request: {e}"))
        })?;

        self.socket
            .clone()
            .call(request)
            .await
            .map_err(|e| LspError::RpcError {
                code: Some(e.code.0),
                message: format!("Initialization failed: {}. Check logs for details", e.message),
            })?;

        self.socket
            .notify::<Initialized>(InitializedParams {})
            .map_err(|e| LspError::RpcError {
                code: None,
                message: format!("Failed to complete initialization handshake: {e:?}"),
            })?;

        tracing::info!("[analyzer] Server initialized");
        Ok(())
    }

    fn next_request_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn request_raw(
        &self,
        method: &str,
        params: impl Serialize,
    ) -> Result<serde_json::Value, LspError> {
        let id = self.next_request_id();
        let request_json = json!({ "id": id, "method": method, "params": params });
        let request: AnyRequest = serde_json::from_value(request_json)
            .map_err(|e| LspError::InvalidRequest(format!("Failed to serialize {method}: {e}")))?;

        self.socket
            .clone()
            .call(request)
            .await
            .map_err(|e| LspError::RpcError {
                code: Some(e.code.0),
                message: format!("{method} failed: {}", e.message),
            })
    }

    /// Open a document in the server.
    pub async fn did_open(&self, params: DidOpenTextDocumentParams) -> Result<(), LspError> {
        let uri = params.text_document.uri.to_string();
        let version = params.text_document.version as u32;

        tracing::debug!("[analyzer] didOpen {uri} v{version}");

        self.socket
            .notify::<DidOpenTextDocument>(params)
            .map_err(|e| LspError::RpcError {
                code: None,
                message: format!("Lost connection while opening document: {e:?}"),
            })?;

        self.documents
            .write()
            .await
            .insert(uri, DocumentState { version });

        Ok(())
    }

    /// Update a document in the server.
    pub async fn did_change(&self, params: DidChangeTextDocumentParams) -> Result<(), LspError> {
        let uri = params.text_document.uri.to_string();
        let version = params.text_document.version as u32;

        tracing::debug!("[analyzer] didChange {uri} v{version}");

        self.socket
            .notify::<DidChangeTextDocument>(params)
            .map_err(|e| LspError::RpcError {
                code: None,
                message: format!("Lost connection while updating document: {e:?}"),
            })?;

        if let Some(doc) = self.documents.write().await.get_mut(&uri) {
            doc.version = version;
        }

        Ok(())
    }

    /// Version the client last sent for `uri`, if the document is open.
    pub async fn document_version(&self, uri: &Url) -> Option<u32> {
        self.documents
            .read()
            .await
            .get(uri.as_str())
            .map(|d| d.version)
    }
}

impl AnalyzerTransport for AnalyzerClient {
    async fn request<R: Request>(&self, params: R::Params) -> Result<R::Result, LspError> {
        let response = self.request_raw(R::METHOD, params).await?;
        serde_json::from_value(response).map_err(|e| {
            LspError::ParseError(format!("Malformed {} response: {e}", R::METHOD))
        })
    }

    fn notify<N: Notification>(&self, params: N::Params) -> Result<(), LspError> {
        self.socket
            .notify::<N>(params)
            .map_err(|e| LspError::RpcError {
                code: None,
                message: format!("Failed to send {}: {e:?}", N::METHOD),
            })
    }
}

/// Log file for the server's stderr.
fn server_log_file() -> Option<File> {
    let log_dir = dirs::cache_dir()?.join("ra-companion");
    fs::create_dir_all(&log_dir).ok()?;
    File::create(log_dir.join("server.log")).ok()
}

/// Spawn the analyzer process with piped stdio.
fn spawn_server(
    program: &str,
    extra_args: &[String],
) -> Result<(ChildStdin, ChildStdout), LspError> {
    let mut cmd = Command::new(program);
    cmd.args(extra_args);

    let stderr = server_log_file().map_or_else(Stdio::inherit, Stdio::from);

    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(stderr)
        .spawn()
        .map_err(|e| LspError::ServerNotFound {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    let stdin = child.stdin.take().ok_or_else(|| LspError::RpcError {
        code: None,
        message: "Failed to capture server stdin".to_string(),
    })?;
    let stdout = child.stdout.take().ok_or_else(|| LspError::RpcError {
        code: None,
        message: "Failed to capture server stdout".to_string(),
    })?;

    Ok((stdin, stdout))
}
