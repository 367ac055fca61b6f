use crate::error::CompileError;
use crate::flow::{
    BlockDefinition, FlowDefinition, IntoFlow, LegacyFlowConfig, find_block_by_id,
    find_entry_block,
};
use crate::interpreter::{BlockAction, BlockRegistry, parse_block};
use crate::options::CompilerOptions;
use crate::script::{CompiledScript, FlowFormat, StopReason};
use tracing::{debug, warn};

mod legacy;
mod traversal;

use legacy::compile_legacy;
use traversal::Traversal;

/// Compiles flow definitions into call-independent scripts.
///
/// A compiler holds no per-call state and can be shared between requests.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    registry: BlockRegistry,
    options: CompilerOptions,
}

#[derive(Debug, Clone, Default)]
pub struct CompilerBuilder {
    registry: BlockRegistry,
    options: CompilerOptions,
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets blocks stored with `user_type_name` compile as `builtin_type_name`.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if !self.registry.register_alias(user_type_name, builtin_type_name) {
            warn!(
                user_type_name,
                builtin_type_name, "ignoring type mapping to unknown block type"
            );
        }
        self
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            registry: self.registry,
            options: self.options,
        }
    }
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn compile(&self, flow: &FlowDefinition) -> Result<CompiledScript, CompileError> {
        match flow {
            FlowDefinition::Graph(graph) => self.compile_graph(&graph.blocks),
            FlowDefinition::Legacy(config) => Ok(self.compile_legacy(config)),
        }
    }

    /// Converts any `IntoFlow` source before compiling it.
    pub fn compile_flow(&self, flow: impl IntoFlow) -> Result<CompiledScript, CompileError> {
        let flow = flow.into_flow()?;
        self.compile(&flow)
    }

    /// Compiles a block graph starting from its entry block.
    pub fn compile_graph(
        &self,
        blocks: &[BlockDefinition],
    ) -> Result<CompiledScript, CompileError> {
        let entry = find_entry_block(blocks);
        debug!(
            blocks = blocks.len(),
            entry = entry.map(|b| b.id.as_str()),
            "compiling graph flow"
        );
        Traversal::new(blocks, &self.registry, &self.options).run(entry)
    }

    pub fn compile_legacy(&self, config: &LegacyFlowConfig) -> CompiledScript {
        CompiledScript {
            format: FlowFormat::Legacy,
            entry: None,
            verbs: compile_legacy(config, &self.options),
            trace: Vec::new(),
            stop: StopReason::LegacySequence,
        }
    }

    /// Continues a graph flow after the caller answered the gather block `block_id`.
    ///
    /// The successor is the block routed for `digits`, or the gather block's
    /// first connection. Traversal restarts with an empty visited set.
    pub fn resume(
        &self,
        flow: &FlowDefinition,
        block_id: &str,
        digits: &str,
    ) -> Result<CompiledScript, CompileError> {
        let FlowDefinition::Graph(graph) = flow else {
            return Err(CompileError::NotAGraphFlow);
        };
        let blocks = graph.blocks.as_slice();
        let block = find_block_by_id(blocks, block_id)
            .ok_or_else(|| CompileError::BlockNotFound(block_id.to_string()))?;

        let target = match parse_block(block, &self.registry)? {
            BlockAction::Gather(gather) => gather
                .next_block(digits, &block.connections)
                .map(str::to_string),
            _ => block.connections.first().cloned(),
        };
        debug!(block_id, digits, target = target.as_deref(), "resuming flow after input");

        let Some(target) = target else {
            return Traversal::new(blocks, &self.registry, &self.options).run(None);
        };
        let Some(next) = find_block_by_id(blocks, &target) else {
            warn!(block_id, target = target.as_str(), "input routed to missing block");
            return Ok(CompiledScript {
                format: FlowFormat::Graph,
                entry: None,
                verbs: Vec::new(),
                trace: Vec::new(),
                stop: StopReason::DanglingConnection {
                    block_id: block_id.to_string(),
                    target,
                },
            });
        };
        Traversal::new(blocks, &self.registry, &self.options).run(Some(next))
    }
}
