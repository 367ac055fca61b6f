//! # Ringflow - Call-Flow Compiler
//!
//! **Ringflow** turns call flows designed in a visual block editor into
//! voice-response markup. A flow is a graph of blocks (`say`, `gather`,
//! `forward`, `record`, `pause`, `play`, `hangup`, `sms`) joined by ordered
//! connections; at call time the compiler walks it from the entry block and
//! emits one markup fragment per block.
//!
//! ## Core Workflow
//!
//! 1.  **Load the Flow**: Read the stored definition into a `FlowDefinition`, either
//!     directly from JSON or through your own `IntoFlow` implementation. The graph
//!     and the older flat "legacy" format are told apart once, here.
//! 2.  **Compile**: Use `Compiler::builder` to create a compiler and compile the
//!     definition into a `CompiledScript`. Compilation does not depend on the call,
//!     so scripts can be cached or saved with `CompiledScript::save`.
//! 3.  **Respond**: Hand the flow and the `CallContext` of the inbound call to a
//!     `ResponseEnvelope`. It renders the document and replaces any failure with a
//!     fixed, terminating response.
//!
//! Traversal follows only the first connection of each block and never emits a
//! block twice, so compilation finishes after at most one fragment per block,
//! whatever the shape of the graph.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ringflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let flow_json = r#"{
//!         "blocks": [
//!             { "id": "welcome", "type": "say", "config": { "text": "Welcome!" }, "connections": ["menu"] },
//!             { "id": "menu", "type": "gather", "config": { "prompt": "Press 1 for sales." }, "connections": [] }
//!         ]
//!     }"#;
//!
//!     let context = CallContext::new(
//!         "+15550001111",
//!         "+15552223333",
//!         "CA123",
//!         "https://hooks.example.com/voice",
//!     )?;
//!
//!     let envelope = ResponseEnvelope::new(Compiler::builder().build());
//!     let response = envelope.respond(Some(flow_json), &context);
//!
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod context;
pub mod envelope;
pub mod error;
pub mod flow;
pub mod interpreter;
pub mod markup;
pub mod options;
pub mod prelude;
pub mod script;
pub mod trace;
