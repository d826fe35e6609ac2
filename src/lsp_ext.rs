//! Wire contract for rust-analyzer's LSP extensions.
//!
//! rust-analyzer extends stock LSP with custom methods in two namespaces:
//! - `rust-analyzer/*` — introspection and dev tooling specific to the server
//! - `experimental/*` — methods gated behind client capability flags
//!
//! Each method is a marker type carrying its parameter and result shapes via
//! the `lsp_types` `Request`/`Notification` traits, so a call site's params
//! and expected result are paired at compile time. This module declares
//! shapes only; sending lives in [`crate::client`].

use std::collections::HashMap;

use async_lsp::lsp_types::{
    notification::Notification, request::Request, Command, Hover, Location, LocationLink,
    Position, Range, TextDocumentIdentifier, TextDocumentPositionParams, TextEdit, WorkspaceEdit,
};
use serde::{Deserialize, Serialize};

// Overrides of standard LSP methods

/// `textDocument/hover` with a widened position (point or range) and
/// command-link actions attached to the result.
pub enum HoverRequest {}

impl Request for HoverRequest {
    type Params = HoverParams;
    type Result = Option<HoverResult>;
    const METHOD: &'static str = "textDocument/hover";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverParams {
    pub text_document: TextDocumentIdentifier,
    pub position: PositionOrRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionOrRange {
    Position(Position),
    Range(Range),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverResult {
    #[serde(flatten)]
    pub hover: Hover,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<CommandLinkGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandLinkGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub commands: Vec<CommandLink>,
}

/// A command with an optional tooltip for when it is rendered in the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandLink {
    #[serde(flatten)]
    pub command: Command,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

// rust-analyzer namespace

/// Human-readable server status, optionally scoped to one document.
pub enum AnalyzerStatus {}

impl Request for AnalyzerStatus {
    type Params = AnalyzerStatusParams;
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/analyzerStatus";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerStatusParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_document: Option<TextDocumentIdentifier>,
}

pub enum MemoryUsage {}

impl Request for MemoryUsage {
    type Params = ();
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/memoryUsage";
}

pub enum FetchDependencyList {}

impl Request for FetchDependencyList {
    type Params = FetchDependencyListParams;
    type Result = FetchDependencyListResult;
    const METHOD: &'static str = "rust-analyzer/fetchDependencyList";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchDependencyListParams {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchDependencyListResult {
    pub crates: Vec<CrateInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub path: String,
}

pub enum FetchDependencyGraph {}

impl Request for FetchDependencyGraph {
    type Params = FetchDependencyGraphParams;
    type Result = FetchDependencyGraphResult;
    const METHOD: &'static str = "rust-analyzer/fetchDependencyGraph";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchDependencyGraphParams {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchDependencyGraphResult {
    pub crates: Vec<CrateInfo>,
}

/// Expand the macro call at a position, one step.
pub enum ExpandMacro {}

impl Request for ExpandMacro {
    type Params = ExpandMacroParams;
    type Result = Option<ExpandedMacro>;
    const METHOD: &'static str = "rust-analyzer/expandMacro";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandMacroParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedMacro {
    pub name: String,
    pub expansion: String,
}

pub enum ViewSyntaxTree {}

impl Request for ViewSyntaxTree {
    type Params = ViewSyntaxTreeParams;
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/viewSyntaxTree";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSyntaxTreeParams {
    pub text_document: TextDocumentIdentifier,
}

/// Render the crate graph as graphviz source. `full` includes deps and
/// sysroot crates, not just workspace members.
pub enum ViewCrateGraph {}

impl Request for ViewCrateGraph {
    type Params = ViewCrateGraphParams;
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/viewCrateGraph";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewCrateGraphParams {
    pub full: bool,
}

/// The server's own copy of a file's text, for desync debugging.
pub enum ViewFileText {}

impl Request for ViewFileText {
    type Params = TextDocumentIdentifier;
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/viewFileText";
}

pub enum ViewHir {}

impl Request for ViewHir {
    type Params = TextDocumentPositionParams;
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/viewHir";
}

pub enum ViewMir {}

impl Request for ViewMir {
    type Params = TextDocumentPositionParams;
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/viewMir";
}

/// Evaluate the function at the cursor with the built-in MIR interpreter and
/// return its output.
pub enum InterpretFunction {}

impl Request for InterpretFunction {
    type Params = TextDocumentPositionParams;
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/interpretFunction";
}

pub enum ViewItemTree {}

impl Request for ViewItemTree {
    type Params = ViewItemTreeParams;
    type Result = String;
    const METHOD: &'static str = "rust-analyzer/viewItemTree";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItemTreeParams {
    pub text_document: TextDocumentIdentifier,
}

/// Recursive memory layout of the type under the cursor.
pub enum ViewRecursiveMemoryLayout {}

impl Request for ViewRecursiveMemoryLayout {
    type Params = TextDocumentPositionParams;
    type Result = Option<RecursiveMemoryLayout>;
    const METHOD: &'static str = "rust-analyzer/viewRecursiveMemoryLayout";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveMemoryLayout {
    pub nodes: Vec<RecursiveMemoryLayoutNode>,
}

/// One node of the flattened layout tree. A node's children are the
/// `children_len` entries starting at `children_start`; `parent_idx` of the
/// root is -1. Field names are snake_case on the wire, unlike the rest of
/// the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveMemoryLayoutNode {
    pub item_name: String,
    pub typename: String,
    pub size: u64,
    pub alignment: u64,
    pub offset: u64,
    pub parent_idx: i64,
    pub children_start: i64,
    pub children_len: u64,
}

/// Tests covering the item at a position.
pub enum RelatedTests {}

impl Request for RelatedTests {
    type Params = TextDocumentPositionParams;
    type Result = Vec<TestInfo>;
    const METHOD: &'static str = "rust-analyzer/relatedTests";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestInfo {
    pub runnable: Runnable,
}

pub enum ReloadWorkspace {}

impl Request for ReloadWorkspace {
    type Params = ();
    type Result = ();
    const METHOD: &'static str = "rust-analyzer/reloadWorkspace";
}

pub enum RebuildProcMacros {}

impl Request for RebuildProcMacros {
    type Params = ();
    type Result = ();
    const METHOD: &'static str = "rust-analyzer/rebuildProcMacros";
}

/// Cancel the running flycheck pass, if any.
pub enum CancelFlycheck {}

impl Notification for CancelFlycheck {
    type Params = ();
    const METHOD: &'static str = "rust-analyzer/cancelFlycheck";
}

/// Clear all flycheck diagnostics.
pub enum ClearFlycheck {}

impl Notification for ClearFlycheck {
    type Params = ();
    const METHOD: &'static str = "rust-analyzer/clearFlycheck";
}

/// Ask for a flycheck pass, scoped to the workspace of `text_document` when
/// given.
pub enum RunFlycheck {}

impl Notification for RunFlycheck {
    type Params = RunFlycheckParams;
    const METHOD: &'static str = "rust-analyzer/runFlycheck";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFlycheckParams {
    pub text_document: Option<TextDocumentIdentifier>,
}

/// Server asks the client to bring its log view to front.
pub enum OpenServerLogs {}

impl Notification for OpenServerLogs {
    type Params = ();
    const METHOD: &'static str = "rust-analyzer/openServerLogs";
}

// experimental namespace

/// Join the selected lines into one, fixing up syntax along the way.
pub enum JoinLines {}

impl Request for JoinLines {
    type Params = JoinLinesParams;
    type Result = Vec<TextEdit>;
    const METHOD: &'static str = "experimental/joinLines";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinLinesParams {
    pub text_document: TextDocumentIdentifier,
    pub ranges: Vec<Range>,
}

pub enum MatchingBrace {}

impl Request for MatchingBrace {
    type Params = MatchingBraceParams;
    type Result = Vec<Position>;
    const METHOD: &'static str = "experimental/matchingBrace";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingBraceParams {
    pub text_document: TextDocumentIdentifier,
    pub positions: Vec<Position>,
}

/// Move the item under the cursor (or the selection) up or down past its
/// syntactic neighbour.
pub enum MoveItem {}

impl Request for MoveItem {
    type Params = MoveItemParams;
    type Result = Vec<TextEdit>;
    const METHOD: &'static str = "experimental/moveItem";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemParams {
    pub text_document: TextDocumentIdentifier,
    pub range: Range,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Typing assist for Enter: continue doc comments, split strings, and the
/// like. `None` or an empty edit list means "use the plain newline".
pub enum OnEnter {}

impl Request for OnEnter {
    type Params = TextDocumentPositionParams;
    type Result = Option<Vec<TextEdit>>;
    const METHOD: &'static str = "experimental/onEnter";
}

pub enum OpenCargoToml {}

impl Request for OpenCargoToml {
    type Params = OpenCargoTomlParams;
    type Result = Location;
    const METHOD: &'static str = "experimental/openCargoToml";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCargoTomlParams {
    pub text_document: TextDocumentIdentifier,
}

/// Documentation links for the symbol under the cursor.
pub enum ExternalDocs {}

impl Request for ExternalDocs {
    type Params = TextDocumentPositionParams;
    type Result = DocsUrls;
    const METHOD: &'static str = "experimental/externalDocs";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocsUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}

pub enum ParentModule {}

impl Request for ParentModule {
    type Params = TextDocumentPositionParams;
    type Result = Option<Vec<LocationLink>>;
    const METHOD: &'static str = "experimental/parentModule";
}

pub enum ChildModules {}

impl Request for ChildModules {
    type Params = TextDocumentPositionParams;
    type Result = Option<Vec<LocationLink>>;
    const METHOD: &'static str = "experimental/childModules";
}

/// Things that can be run from a document: tests, binaries, doctests.
pub enum Runnables {}

impl Request for Runnables {
    type Params = RunnablesParams;
    type Result = Vec<Runnable>;
    const METHOD: &'static str = "experimental/runnables";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnablesParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Option<Position>,
}

/// An external invocation the user can trigger, described by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runnable {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationLink>,
    #[serde(flatten)]
    pub args: RunnableArgs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "args", rename_all = "lowercase")]
pub enum RunnableArgs {
    Cargo(CargoRunnableArgs),
    Shell(ShellRunnableArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonRunnableArgs {
    /// Environment variables to set before running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<HashMap<String, String>>,
    /// Working directory to run in.
    pub cwd: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoRunnableArgs {
    #[serde(flatten)]
    pub common: CommonRunnableArgs,
    /// Workspace root of the cargo project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<String>,
    /// Arguments for the produced executable, passed after `--`.
    pub executable_args: Vec<String>,
    /// Arguments for cargo itself.
    pub cargo_args: Vec<String>,
    /// Command to run instead of `cargo`, from user config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_cargo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellRunnableArgs {
    #[serde(flatten)]
    pub common: CommonRunnableArgs,
    pub kind: String,
    pub program: String,
    pub args: Vec<String>,
}

/// Structural search and replace over the whole workspace.
pub enum Ssr {}

impl Request for Ssr {
    type Params = SsrParams;
    type Result = WorkspaceEdit;
    const METHOD: &'static str = "experimental/ssr";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsrParams {
    /// A `search <- replace` pattern, e.g. `foo($a, $b) <- $a.foo($b)`.
    pub query: String,
    /// Only check the query for syntax errors, produce no edit.
    pub parse_only: bool,
    /// Anchor for resolving paths in the pattern.
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
    /// When non-empty, restrict the search to these ranges.
    pub selections: Vec<Range>,
}

/// Server-pushed health report.
pub enum ServerStatus {}

impl Notification for ServerStatus {
    type Params = ServerStatusParams;
    const METHOD: &'static str = "experimental/serverStatus";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatusParams {
    pub health: Health,
    /// No background work pending.
    pub quiescent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Health {
    Ok,
    Warning,
    Error,
}

// Test lifecycle. Discovery produces a tree of test items; a run produces a
// stream of per-id state notifications, interleaved with output chunks, and
// ends with `endRunTest`.

pub enum DiscoverTest {}

impl Request for DiscoverTest {
    type Params = DiscoverTestParams;
    type Result = DiscoverTestResults;
    const METHOD: &'static str = "experimental/discoverTest";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverTestParams {
    /// Rediscover only under this test; absent means the whole workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverTestResults {
    pub tests: Vec<TestItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_file: Option<Vec<TextDocumentIdentifier>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestItem {
    pub id: String,
    pub label: String,
    pub kind: TestItemKind,
    pub can_resolve_children: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_document: Option<TextDocumentIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runnable: Option<Runnable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestItemKind {
    Package,
    Module,
    Test,
}

pub enum RunTest {}

impl Request for RunTest {
    type Params = RunTestParams;
    type Result = ();
    const METHOD: &'static str = "experimental/runTest";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunTestParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

/// Server-initiated rediscovery, same payload as a `discoverTest` response.
pub enum DiscoveredTests {}

impl Notification for DiscoveredTests {
    type Params = DiscoverTestResults;
    const METHOD: &'static str = "experimental/discoveredTests";
}

/// Abort the in-flight test run.
pub enum AbortRunTest {}

impl Notification for AbortRunTest {
    type Params = ();
    const METHOD: &'static str = "experimental/abortRunTest";
}

/// The test run is over; no more state changes will follow for it.
pub enum EndRunTest {}

impl Notification for EndRunTest {
    type Params = ();
    const METHOD: &'static str = "experimental/endRunTest";
}

/// Raw runner output to append to the test console.
pub enum AppendOutputToRunTest {}

impl Notification for AppendOutputToRunTest {
    type Params = String;
    const METHOD: &'static str = "experimental/appendOutputToRunTest";
}

pub enum ChangeTestState {}

impl Notification for ChangeTestState {
    type Params = ChangeTestStateParams;
    const METHOD: &'static str = "experimental/changeTestState";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTestStateParams {
    pub test_id: String,
    pub state: TestState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "camelCase")]
pub enum TestState {
    Enqueued,
    Started,
    Passed,
    Failed { message: String },
    Skipped,
}

/// Every request method in this catalog. Used by the inbound dispatcher and
/// by the uniqueness tests.
pub const ALL_REQUEST_METHODS: &[&str] = &[
    HoverRequest::METHOD,
    AnalyzerStatus::METHOD,
    MemoryUsage::METHOD,
    FetchDependencyList::METHOD,
    FetchDependencyGraph::METHOD,
    ExpandMacro::METHOD,
    ViewSyntaxTree::METHOD,
    ViewCrateGraph::METHOD,
    ViewFileText::METHOD,
    ViewHir::METHOD,
    ViewMir::METHOD,
    InterpretFunction::METHOD,
    ViewItemTree::METHOD,
    ViewRecursiveMemoryLayout::METHOD,
    RelatedTests::METHOD,
    ReloadWorkspace::METHOD,
    RebuildProcMacros::METHOD,
    JoinLines::METHOD,
    MatchingBrace::METHOD,
    MoveItem::METHOD,
    OnEnter::METHOD,
    OpenCargoToml::METHOD,
    ExternalDocs::METHOD,
    ParentModule::METHOD,
    ChildModules::METHOD,
    Runnables::METHOD,
    Ssr::METHOD,
    DiscoverTest::METHOD,
    RunTest::METHOD,
];

/// Every notification method in this catalog.
pub const ALL_NOTIFICATION_METHODS: &[&str] = &[
    CancelFlycheck::METHOD,
    ClearFlycheck::METHOD,
    RunFlycheck::METHOD,
    OpenServerLogs::METHOD,
    ServerStatus::METHOD,
    DiscoveredTests::METHOD,
    AbortRunTest::METHOD,
    EndRunTest::METHOD,
    AppendOutputToRunTest::METHOD,
    ChangeTestState::METHOD,
];
