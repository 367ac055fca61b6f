//! Tests for graph traversal: entry selection, ordering and termination.
mod common;
use common::*;
use ringflow::prelude::*;
use serde_json::json;

#[test]
fn test_entry_block_has_no_incoming_connection() {
    let blocks = vec![
        block("b", "say", json!({ "text": "B" }), &["c"]),
        block("a", "say", json!({ "text": "A" }), &["b"]),
        block("c", "say", json!({ "text": "C" }), &[]),
    ];
    assert_eq!(find_entry_block(&blocks).map(|b| b.id.as_str()), Some("a"));
}

#[test]
fn test_entry_block_falls_back_to_first_in_cycle() {
    let blocks = vec![
        block("x", "say", json!({ "text": "X" }), &["y"]),
        block("y", "say", json!({ "text": "Y" }), &["x"]),
    ];
    assert_eq!(find_entry_block(&blocks).map(|b| b.id.as_str()), Some("x"));
    assert!(find_entry_block(&[]).is_none());
}

#[test]
fn test_self_loop_does_not_disqualify_entry() {
    let blocks = vec![
        block("loop", "pause", json!({}), &["loop"]),
        block("island", "say", json!({ "text": "Hi" }), &[]),
    ];
    assert_eq!(find_entry_block(&blocks).map(|b| b.id.as_str()), Some("loop"));
}

#[test]
fn test_linear_flow_visits_in_order() {
    let script = compile(&create_linear_flow());

    assert_eq!(script.entry.as_deref(), Some("a"));
    assert_eq!(visited(&script), vec!["a", "b", "c"]);
    assert_eq!(script.verbs.len(), 3);
    assert_eq!(
        script.stop,
        StopReason::EndOfFlow {
            block_id: "c".to_string()
        }
    );
}

#[test]
fn test_cycle_terminates() {
    let flow = graph(vec![
        block("a", "say", json!({ "text": "A" }), &["b"]),
        block("b", "say", json!({ "text": "B" }), &["c"]),
        block("c", "say", json!({ "text": "C" }), &["a"]),
    ]);
    let script = compile(&flow);

    assert_eq!(visited(&script), vec!["a", "b", "c"]);
    assert_eq!(
        script.stop,
        StopReason::Revisited {
            block_id: "c".to_string(),
            target: "a".to_string()
        }
    );
}

#[test]
fn test_hangup_is_always_last() {
    let flow = graph(vec![
        block("a", "say", json!({ "text": "Bye" }), &["h"]),
        block("h", "hangup", json!({}), &["after"]),
        block("after", "say", json!({ "text": "Never spoken" }), &[]),
    ]);
    let script = compile(&flow);

    assert_eq!(script.verbs.last(), Some(&Verb::Hangup));
    assert_eq!(visited(&script), vec!["a", "h"]);
    assert!(matches!(script.stop, StopReason::Hangup { .. }));
}

#[test]
fn test_gather_halts_traversal() {
    let script = compile(&create_ivr_flow());

    assert_eq!(visited(&script), vec!["welcome", "menu"]);
    assert_eq!(
        script.stop,
        StopReason::AwaitingInput {
            block_id: "menu".to_string()
        }
    );
}

#[test]
fn test_gather_without_prompt_still_halts() {
    let flow = graph(vec![
        block("g", "gather", json!({}), &["next"]),
        block("next", "say", json!({ "text": "Unreached" }), &[]),
    ]);
    let script = compile(&flow);

    assert!(script.verbs.is_empty());
    assert_eq!(visited(&script), vec!["g"]);
}

#[test]
fn test_only_first_connection_is_followed() {
    let flow = graph(vec![
        block("a", "say", json!({ "text": "A" }), &["b", "c"]),
        block("b", "say", json!({ "text": "B" }), &[]),
        block("c", "say", json!({ "text": "C" }), &[]),
    ]);
    assert_eq!(visited(&compile(&flow)), vec!["a", "b"]);
}

#[test]
fn test_dangling_connection_stops_quietly() {
    let flow = graph(vec![block("a", "say", json!({ "text": "A" }), &["ghost"])]);
    let script = compile(&flow);

    assert_eq!(script.verbs.len(), 1);
    assert_eq!(
        script.stop,
        StopReason::DanglingConnection {
            block_id: "a".to_string(),
            target: "ghost".to_string()
        }
    );
}

#[test]
fn test_empty_block_list_compiles_to_nothing() {
    let script = Compiler::default().compile_graph(&[]).expect("compiles");
    assert!(script.is_empty());
    assert!(script.entry.is_none());
    assert_eq!(script.stop, StopReason::EmptyFlow);
}

#[test]
fn test_unknown_type_fails_compilation() {
    let flow = graph(vec![block("a", "teleport", json!({}), &[])]);
    let result = Compiler::default().compile(&flow);
    assert!(matches!(result, Err(CompileError::UnknownBlockType { .. })));
}

#[test]
fn test_compiler_with_type_mapping() {
    let flow = graph(vec![block("a", "message", json!({ "text": "Hi" }), &[])]);
    let compiler = Compiler::builder()
        .with_type_mapping("message", "say")
        .build();

    let script = compiler.compile(&flow).expect("mapping makes the type known");
    assert_eq!(script.trace[0].block_type, BlockType::Say);
}

#[test]
fn test_compile_flow_detects_format() {
    let compiler = Compiler::default();

    let graph_script = compiler
        .compile_flow(json!({ "blocks": [{ "id": "a", "type": "hangup" }] }))
        .expect("graph compiles");
    assert_eq!(graph_script.format, FlowFormat::Graph);

    let legacy_script = compiler
        .compile_flow(json!({ "greeting": "Hello" }))
        .expect("legacy compiles");
    assert_eq!(legacy_script.format, FlowFormat::Legacy);
}

#[test]
fn test_resume_follows_route() {
    let compiler = Compiler::default();
    let script = compiler
        .resume(&create_ivr_flow(), "menu", "1")
        .expect("resumes");

    assert_eq!(visited(&script), vec!["sales", "goodbye", "end"]);
    assert_eq!(script.verbs.last(), Some(&Verb::Hangup));
}

#[test]
fn test_resume_without_route_uses_first_connection() {
    let compiler = Compiler::default();
    let script = compiler
        .resume(&create_ivr_flow(), "menu", "9")
        .expect("resumes");
    assert_eq!(visited(&script), vec!["goodbye", "end"]);
}

#[test]
fn test_resume_revisits_blocks_from_earlier_request() {
    let flow = graph(vec![
        block("menu", "gather", json!({ "prompt": "Press any key" }), &["menu"]),
    ]);
    let script = Compiler::default().resume(&flow, "menu", "1").expect("resumes");

    assert_eq!(visited(&script), vec!["menu"]);
    assert!(matches!(script.stop, StopReason::AwaitingInput { .. }));
}

#[test]
fn test_resume_errors() {
    let compiler = Compiler::default();
    assert!(matches!(
        compiler.resume(&create_ivr_flow(), "nope", "1"),
        Err(CompileError::BlockNotFound(_))
    ));

    let legacy = FlowDefinition::Legacy(LegacyFlowConfig::default());
    assert!(matches!(
        compiler.resume(&legacy, "menu", "1"),
        Err(CompileError::NotAGraphFlow)
    ));
}
