//! Common test utilities for building flows and call contexts.
use ringflow::prelude::*;
use serde_json::{Map, Value, json};

pub const CALLBACK_BASE: &str = "https://hooks.example.com/api/voice";

/// Creates a block with the given config object and connections.
#[allow(dead_code)]
pub fn block(id: &str, block_type: &str, config: Value, connections: &[&str]) -> BlockDefinition {
    let config = match config {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    BlockDefinition {
        id: id.to_string(),
        block_type: block_type.to_string(),
        config,
        connections: connections.iter().map(|c| c.to_string()).collect(),
        position: None,
    }
}

#[allow(dead_code)]
pub fn graph(blocks: Vec<BlockDefinition>) -> FlowDefinition {
    FlowDefinition::Graph(GraphFlow { blocks })
}

/// A standard inbound call.
#[allow(dead_code)]
pub fn context() -> CallContext {
    CallContext::new("+15550001111", "+15552223333", "CA42", CALLBACK_BASE)
        .expect("valid test context")
}

/// Welcome -> menu gather -> (unreachable) goodbye.
///
/// Pressing 1 routes to `sales`, anything else follows the first connection.
#[allow(dead_code)]
pub fn create_ivr_flow() -> FlowDefinition {
    graph(vec![
        block("welcome", "say", json!({ "text": "Welcome to Acme." }), &["menu"]),
        block(
            "menu",
            "gather",
            json!({
                "prompt": "Press 1 for sales, 2 for support.",
                "routes": { "1": "sales", "2": "support" }
            }),
            &["goodbye"],
        ),
        block("sales", "forward", json!({ "number": "+15557770000" }), &["goodbye"]),
        block("support", "record", json!({ "prompt": "Describe your issue." }), &["goodbye"]),
        block("goodbye", "say", json!({ "text": "Goodbye." }), &["end"]),
        block("end", "hangup", json!({}), &[]),
    ])
}

/// `a -> b -> c`, a linear flow of simple blocks.
#[allow(dead_code)]
pub fn create_linear_flow() -> FlowDefinition {
    graph(vec![
        block("a", "say", json!({ "text": "First" }), &["b"]),
        block("b", "pause", json!({}), &["c"]),
        block("c", "say", json!({ "text": "Last" }), &[]),
    ])
}

#[allow(dead_code)]
pub fn compile(flow: &FlowDefinition) -> CompiledScript {
    Compiler::builder()
        .build()
        .compile(flow)
        .expect("flow should compile")
}

/// Ids of the blocks that were emitted, in order.
#[allow(dead_code)]
pub fn visited(script: &CompiledScript) -> Vec<&str> {
    script.trace.iter().map(|s| s.block_id.as_str()).collect()
}
