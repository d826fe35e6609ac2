//! Contract tests for the extension catalog: method-name uniqueness and
//! wire-shape fidelity for the types the server is picky about.

use std::collections::{HashMap, HashSet};

use async_lsp::lsp_types::{Position, Range, TextDocumentIdentifier, Url};
use ra_companion::lsp_ext::{
    AnalyzerStatusParams, CargoRunnableArgs, CommonRunnableArgs, DiscoverTestResults, Health,
    RecursiveMemoryLayout, Runnable, RunnableArgs, RunnablesParams, ServerStatusParams, TestItem,
    TestItemKind, TestState, ALL_NOTIFICATION_METHODS, ALL_REQUEST_METHODS,
};
use serde_json::json;

#[test]
fn request_methods_are_pairwise_distinct() {
    let mut seen = HashSet::new();
    for method in ALL_REQUEST_METHODS {
        assert!(seen.insert(method), "duplicate request method: {method}");
    }
}

#[test]
fn notification_methods_are_pairwise_distinct() {
    let mut seen = HashSet::new();
    for method in ALL_NOTIFICATION_METHODS {
        assert!(seen.insert(method), "duplicate notification method: {method}");
    }
}

#[test]
fn unscoped_status_params_serialize_to_an_empty_object() {
    let params = AnalyzerStatusParams {
        text_document: None,
    };
    assert_eq!(serde_json::to_value(params).unwrap(), json!({}));
}

#[test]
fn runnables_position_is_required_but_nullable() {
    let params = RunnablesParams {
        text_document: TextDocumentIdentifier {
            uri: Url::parse("file:///demo/src/lib.rs").unwrap(),
        },
        position: None,
    };
    let value = serde_json::to_value(params).unwrap();
    assert!(value.as_object().unwrap().contains_key("position"));
    assert!(value["position"].is_null());
}

#[test]
fn test_states_use_the_tagged_wire_shape() {
    assert_eq!(
        serde_json::to_value(TestState::Passed).unwrap(),
        json!({ "tag": "passed" })
    );
    assert_eq!(
        serde_json::to_value(TestState::Failed {
            message: "left != right".to_string(),
        })
        .unwrap(),
        json!({ "tag": "failed", "message": "left != right" })
    );
}

#[test]
fn cargo_runnable_matches_the_wire_shape() {
    let runnable = Runnable {
        label: "test demo::it_works".to_string(),
        location: None,
        args: RunnableArgs::Cargo(CargoRunnableArgs {
            common: CommonRunnableArgs {
                environment: Some(HashMap::from([(
                    "RUST_BACKTRACE".to_string(),
                    "1".to_string(),
                )])),
                cwd: "/demo".to_string(),
            },
            workspace_root: Some("/demo".to_string()),
            executable_args: vec!["it_works".to_string()],
            cargo_args: vec!["test".to_string()],
            override_cargo: None,
        }),
    };

    let value = serde_json::to_value(&runnable).unwrap();
    assert_eq!(
        value,
        json!({
            "label": "test demo::it_works",
            "kind": "cargo",
            "args": {
                "environment": { "RUST_BACKTRACE": "1" },
                "cwd": "/demo",
                "workspaceRoot": "/demo",
                "executableArgs": ["it_works"],
                "cargoArgs": ["test"],
            }
        })
    );

    let parsed: Runnable = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, runnable);
}

#[test]
fn server_status_parses_the_server_payload() {
    let status: ServerStatusParams = serde_json::from_value(json!({
        "health": "warning",
        "quiescent": false,
        "message": "proc-macro server crashed",
    }))
    .unwrap();

    assert_eq!(status.health, Health::Warning);
    assert!(!status.quiescent);
    assert_eq!(status.message.as_deref(), Some("proc-macro server crashed"));

    let minimal: ServerStatusParams =
        serde_json::from_value(json!({ "health": "ok", "quiescent": true })).unwrap();
    assert_eq!(minimal.health, Health::Ok);
    assert_eq!(minimal.message, None);
}

#[test]
fn memory_layout_nodes_keep_their_snake_case_fields() {
    let layout: RecursiveMemoryLayout = serde_json::from_value(json!({
        "nodes": [
            {
                "item_name": "v",
                "typename": "Vec<u8>",
                "size": 24,
                "alignment": 8,
                "offset": 0,
                "parent_idx": -1,
                "children_start": 1,
                "children_len": 3,
            },
        ]
    }))
    .unwrap();

    assert_eq!(layout.nodes.len(), 1);
    assert_eq!(layout.nodes[0].typename, "Vec<u8>");
    assert_eq!(layout.nodes[0].parent_idx, -1);
    assert_eq!(
        serde_json::to_value(&layout).unwrap()["nodes"][0]["children_len"],
        3
    );
}

#[test]
fn discovery_results_round_trip_field_for_field() {
    let results = DiscoverTestResults {
        tests: vec![
            TestItem {
                id: "demo".to_string(),
                label: "demo".to_string(),
                kind: TestItemKind::Package,
                can_resolve_children: true,
                parent: None,
                text_document: None,
                range: None,
                runnable: None,
            },
            TestItem {
                id: "demo::it_works".to_string(),
                label: "it_works".to_string(),
                kind: TestItemKind::Test,
                can_resolve_children: false,
                parent: Some("demo".to_string()),
                text_document: Some(TextDocumentIdentifier {
                    uri: Url::parse("file:///demo/src/lib.rs").unwrap(),
                }),
                range: Some(Range::new(Position::new(10, 4), Position::new(14, 5))),
                runnable: Some(Runnable {
                    label: "test it_works".to_string(),
                    location: None,
                    args: RunnableArgs::Cargo(CargoRunnableArgs {
                        common: CommonRunnableArgs {
                            environment: None,
                            cwd: "/demo".to_string(),
                        },
                        workspace_root: None,
                        executable_args: vec!["it_works".to_string()],
                        cargo_args: vec!["test".to_string()],
                        override_cargo: None,
                    }),
                }),
            },
        ],
        scope: Some(vec!["demo".to_string()]),
        scope_file: None,
    };

    let value = serde_json::to_value(&results).unwrap();
    let reparsed: DiscoverTestResults = serde_json::from_value(value).unwrap();
    assert_eq!(reparsed, results);

    // Item kinds are lowercase tags on the wire.
    let kinds: Vec<_> = serde_json::to_value(&results).unwrap()["tests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, ["package", "test"]);
}
