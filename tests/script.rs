//! Tests for persisting compiled scripts and explaining their traversal.
mod common;
use common::*;
use ringflow::prelude::*;
use serde_json::json;
use std::env;
use std::fs;

#[test]
fn test_script_survives_persistence() {
    let script = compile(&create_ivr_flow());

    let bytes = script.to_bytes().expect("encodes");
    assert_eq!(CompiledScript::from_bytes(&bytes).expect("decodes"), script);

    let path = env::temp_dir().join(format!("ringflow-script-{}.bin", std::process::id()));
    let path = path.to_str().expect("utf-8 temp path");
    script.save(path).expect("saves");
    let loaded = CompiledScript::from_file(path).expect("loads");
    fs::remove_file(path).ok();

    assert_eq!(loaded, script);
}

#[test]
fn test_saved_script_renders_per_call() {
    let script = compile(&create_ivr_flow());
    let envelope = ResponseEnvelope::default();

    let first = envelope.render(&script, &context()).expect("renders");
    let other_call = CallContext::new(
        "+15550004444",
        "+15552223333",
        "CA43",
        "https://other.example.com/hooks",
    )
    .expect("valid context");
    let second = envelope.render(&script, &other_call).expect("renders");

    assert!(first.contains("https://hooks.example.com/api/voice/gather?blockId=menu"));
    assert!(second.contains("https://other.example.com/hooks/gather?blockId=menu"));
}

#[test]
fn test_corrupt_script_bytes_are_rejected() {
    assert!(CompiledScript::from_bytes(&[0xff, 0xff, 0xff]).is_err());
    assert!(CompiledScript::from_file("/definitely/missing/script.bin").is_err());
}

#[test]
fn test_trace_formatter() {
    let script = compile(&create_ivr_flow());
    assert_eq!(
        TraceFormatter::format_script(&script),
        "welcome (say) -> menu (gather) | awaiting input for 'menu'"
    );

    let silent = compile(&graph(vec![block("quiet", "say", json!({}), &["gone"])]));
    assert_eq!(
        TraceFormatter::format_script(&silent),
        "quiet (say, silent) | 'quiet' connects to missing block 'gone'"
    );

    let empty = Compiler::default().compile_graph(&[]).expect("compiles");
    assert_eq!(TraceFormatter::format_script(&empty), "(no blocks) | empty flow");
}
