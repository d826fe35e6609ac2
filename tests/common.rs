#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use async_lsp::lsp_types::{
    notification::Notification, request::Request, Position, TextEdit, Url,
};
use ra_companion::{
    client::AnalyzerTransport,
    editor::{ActiveEditor, EditorHost, HostError, ProviderHandle},
    error::LspError,
};
use serde_json::Value;

/// Canned transport: replies from a method-keyed table and records every
/// message sent through it.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, Value>,
    failing: HashSet<String>,
    requests: RefCell<Vec<(String, Value)>>,
    notifications: RefCell<Vec<(String, Value)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned success for `R`, serialized once up front.
    pub fn respond<R: Request>(mut self, result: &R::Result) -> Self {
        let value = serde_json::to_value(result).expect("canned response serializes");
        self.responses.insert(R::METHOD.to_string(), value);
        self
    }

    /// Make every `R` request fail with an opaque RPC error.
    pub fn fail_on<R: Request>(mut self) -> Self {
        self.failing.insert(R::METHOD.to_string());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Every request sent, as (method, params) pairs.
    pub fn requests_sent(&self) -> Vec<(String, Value)> {
        self.requests.borrow().clone()
    }

    pub fn notifications_sent(&self) -> Vec<(String, Value)> {
        self.notifications.borrow().clone()
    }
}

impl AnalyzerTransport for FakeTransport {
    async fn request<R: Request>(&self, params: R::Params) -> Result<R::Result, LspError> {
        let params = serde_json::to_value(params).expect("request params serialize");
        self.requests
            .borrow_mut()
            .push((R::METHOD.to_string(), params));

        if self.failing.contains(R::METHOD) {
            return Err(LspError::RpcError {
                code: Some(-32803),
                message: "canned failure".to_string(),
            });
        }

        let value = self
            .responses
            .get(R::METHOD)
            .cloned()
            .unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| LspError::ParseError(e.to_string()))
    }

    fn notify<N: Notification>(&self, params: N::Params) -> Result<(), LspError> {
        let params = serde_json::to_value(params).expect("notification params serialize");
        self.notifications
            .borrow_mut()
            .push((N::METHOD.to_string(), params));
        Ok(())
    }
}

/// One recorded editor effect.
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    AppliedEdits { uri: Url, edits: Vec<TextEdit> },
    InsertedNewline,
    ShowedDocument(Url),
    Registered { handle: ProviderHandle, scheme: String },
    Released(ProviderHandle),
    EmittedChange(Url),
}

/// Editor host that records every effect instead of performing it.
#[derive(Default)]
pub struct FakeHost {
    active: Option<ActiveEditor>,
    next_handle: u64,
    pub actions: Vec<HostAction>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active_editor(uri: Url, line: u32, character: u32) -> Self {
        Self {
            active: Some(ActiveEditor {
                uri,
                cursor: Position::new(line, character),
            }),
            ..Self::default()
        }
    }

    pub fn newline_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, HostAction::InsertedNewline))
            .count()
    }

    pub fn applied_edits(&self) -> Vec<(Url, Vec<TextEdit>)> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                HostAction::AppliedEdits { uri, edits } => Some((uri.clone(), edits.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn registrations(&self) -> Vec<(ProviderHandle, String)> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                HostAction::Registered { handle, scheme } => Some((*handle, scheme.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn releases(&self) -> Vec<ProviderHandle> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                HostAction::Released(handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }
}

impl EditorHost for FakeHost {
    fn active_editor(&self) -> Option<ActiveEditor> {
        self.active.clone()
    }

    fn apply_edits(&mut self, uri: &Url, edits: &[TextEdit]) -> Result<(), HostError> {
        self.actions.push(HostAction::AppliedEdits {
            uri: uri.clone(),
            edits: edits.to_vec(),
        });
        Ok(())
    }

    fn insert_newline(&mut self) -> Result<(), HostError> {
        self.actions.push(HostAction::InsertedNewline);
        Ok(())
    }

    fn show_document(&mut self, uri: &Url) -> Result<(), HostError> {
        self.actions.push(HostAction::ShowedDocument(uri.clone()));
        Ok(())
    }

    fn register_provider(&mut self, scheme: &str) -> Result<ProviderHandle, HostError> {
        self.next_handle += 1;
        let handle = ProviderHandle(self.next_handle);
        self.actions.push(HostAction::Registered {
            handle,
            scheme: scheme.to_string(),
        });
        Ok(handle)
    }

    fn release_provider(&mut self, handle: ProviderHandle) {
        self.actions.push(HostAction::Released(handle));
    }

    fn emit_changed(&mut self, uri: &Url) {
        self.actions.push(HostAction::EmittedChange(uri.clone()));
    }
}

pub fn file_url(path: &str) -> Url {
    Url::parse(&format!("file://{path}")).expect("test URL parses")
}
