//! Client-side state for the server's test explorer.
//!
//! Discovery responses build the tree; run notifications mutate per-test
//! states. Notifications are applied independently, keyed by the test id
//! they carry, so interleaving with unrelated traffic is harmless.

use std::collections::HashMap;

use crate::{
    client::ServerEvent,
    lsp_ext::{ChangeTestStateParams, DiscoverTestResults, TestItem, TestState},
};

/// Discovered test tree plus per-test run states.
#[derive(Debug, Default)]
pub struct TestExplorer {
    items: HashMap<String, TestItem>,
    /// Discovery order, for stable iteration.
    order: Vec<String>,
    states: HashMap<String, TestState>,
    output: String,
    run_in_progress: bool,
    scope: Option<Vec<String>>,
}

impl TestExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tree with a fresh discovery result.
    ///
    /// Previous items and run states are discarded; the optional scope
    /// restriction from the response is kept for consumers.
    pub fn apply_discovery(&mut self, results: DiscoverTestResults) {
        self.items.clear();
        self.order.clear();
        self.states.clear();

        for item in results.tests {
            self.order.push(item.id.clone());
            self.items.insert(item.id.clone(), item);
        }
        self.scope = results.scope;

        tracing::debug!("Discovered {} tests", self.order.len());
    }

    /// Record a state change for one test.
    ///
    /// Idempotent per (test id, state). Ids discovery has not (yet) reported
    /// are recorded too, since discovery and run notifications interleave.
    pub fn apply_state(&mut self, change: ChangeTestStateParams) {
        if !self.items.contains_key(&change.test_id) {
            tracing::debug!("State change for undiscovered test {}", change.test_id);
        }
        self.states.insert(change.test_id, change.state);
    }

    /// Append a chunk of runner output to the run console.
    pub fn append_output(&mut self, chunk: &str) {
        self.output.push_str(chunk);
    }

    /// Mark a run as started and reset its console.
    pub fn begin_run(&mut self) {
        self.run_in_progress = true;
        self.output.clear();
    }

    /// The server announced the end of the run.
    pub fn finish_run(&mut self) {
        self.run_in_progress = false;
    }

    /// Apply one server event. Events that do not concern the test explorer
    /// are ignored.
    pub fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::DiscoveredTests(results) => self.apply_discovery(results),
            ServerEvent::TestState(change) => self.apply_state(change),
            ServerEvent::TestOutput(chunk) => self.append_output(&chunk),
            ServerEvent::TestRunEnded => self.finish_run(),
            ServerEvent::Status(_) | ServerEvent::OpenServerLogs => {}
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn item(&self, id: &str) -> Option<&TestItem> {
        self.items.get(id)
    }

    pub fn state(&self, id: &str) -> Option<&TestState> {
        self.states.get(id)
    }

    /// Items in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &TestItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Items without a parent, in discovery order.
    pub fn roots(&self) -> Vec<&TestItem> {
        self.iter().filter(|item| item.parent.is_none()).collect()
    }

    /// Direct children of `parent`, in discovery order.
    pub fn children(&self, parent: &str) -> Vec<&TestItem> {
        self.iter()
            .filter(|item| item.parent.as_deref() == Some(parent))
            .collect()
    }

    pub fn run_in_progress(&self) -> bool {
        self.run_in_progress
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn scope(&self) -> Option<&[String]> {
        self.scope.as_deref()
    }
}
