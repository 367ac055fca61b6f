//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the ringflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use ringflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow_json = std::fs::read_to_string("path/to/flow.json")?;
//! let flow = FlowDefinition::from_json(&flow_json)?;
//!
//! let compiler = Compiler::builder().with_type_mapping("message", "say").build();
//! let script = compiler.compile(&flow)?;
//! println!("{}", TraceFormatter::format_script(&script));
//! # Ok(())
//! # }
//! ```

// Compilation and response
pub use crate::compiler::{Compiler, CompilerBuilder};
pub use crate::context::CallContext;
pub use crate::envelope::{ResponseEnvelope, ResponseOutcome, VoiceResponse};
pub use crate::options::CompilerOptions;
pub use crate::script::{CompiledScript, FlowFormat, StopReason, TraceStep};

// Flow model
pub use crate::flow::{
    BlockDefinition, FlowDefinition, FlowRecord, GraphFlow, IntoFlow, LegacyFlowConfig,
    Position, find_block_by_id, find_entry_block,
};
pub use crate::interpreter::{BlockAction, BlockType, Continuation, Step};
pub use crate::markup::Verb;

// Error types
pub use crate::error::{CompileError, FlowConversionError, FlowParseError, RenderError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
