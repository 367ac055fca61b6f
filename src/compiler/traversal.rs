use crate::error::CompileError;
use crate::flow::{BlockDefinition, find_block_by_id};
use crate::interpreter::{BlockRegistry, Continuation, interpret, parse_block};
use crate::markup::Verb;
use crate::options::CompilerOptions;
use crate::script::{CompiledScript, FlowFormat, StopReason, TraceStep};
use ahash::AHashSet;
use tracing::{debug, warn};

/// Walks a block graph along first connections, emitting each block at most once.
pub(super) struct Traversal<'a> {
    blocks: &'a [BlockDefinition],
    registry: &'a BlockRegistry,
    options: &'a CompilerOptions,
    visited: AHashSet<&'a str>,
    verbs: Vec<Verb>,
    trace: Vec<TraceStep>,
}

impl<'a> Traversal<'a> {
    pub(super) fn new(
        blocks: &'a [BlockDefinition],
        registry: &'a BlockRegistry,
        options: &'a CompilerOptions,
    ) -> Self {
        Self {
            blocks,
            registry,
            options,
            visited: AHashSet::with_capacity(blocks.len()),
            verbs: Vec::new(),
            trace: Vec::new(),
        }
    }

    pub(super) fn run(
        mut self,
        start: Option<&'a BlockDefinition>,
    ) -> Result<CompiledScript, CompileError> {
        let Some(mut current) = start else {
            return Ok(self.finish(None, StopReason::EmptyFlow));
        };
        let entry = Some(current.id.clone());

        let stop = loop {
            self.visited.insert(current.id.as_str());

            let action = parse_block(current, self.registry)?;
            let step = interpret(&current.id, &action, self.options);
            debug!(
                block_id = %current.id,
                block_type = %action.block_type(),
                verbs = step.fragment.len(),
                "interpreted block"
            );

            self.trace.push(TraceStep {
                block_id: current.id.clone(),
                block_type: action.block_type(),
                verbs_emitted: step.fragment.len(),
            });
            self.verbs.extend(step.fragment);

            match step.continuation {
                Continuation::Terminate => {
                    break StopReason::Hangup {
                        block_id: current.id.clone(),
                    };
                }
                Continuation::AwaitInput => {
                    break StopReason::AwaitingInput {
                        block_id: current.id.clone(),
                    };
                }
                Continuation::Next => {}
            }

            let Some(target) = current.connections.first() else {
                break StopReason::EndOfFlow {
                    block_id: current.id.clone(),
                };
            };
            let Some(next) = find_block_by_id(self.blocks, target) else {
                warn!(block_id = %current.id, target = %target, "connection to missing block");
                break StopReason::DanglingConnection {
                    block_id: current.id.clone(),
                    target: target.clone(),
                };
            };
            if self.visited.contains(next.id.as_str()) {
                warn!(block_id = %current.id, target = %target, "cycle detected, stopping");
                break StopReason::Revisited {
                    block_id: current.id.clone(),
                    target: target.clone(),
                };
            }
            current = next;
        };

        Ok(self.finish(entry, stop))
    }

    fn finish(self, entry: Option<String>, stop: StopReason) -> CompiledScript {
        CompiledScript {
            format: FlowFormat::Graph,
            entry,
            verbs: self.verbs,
            trace: self.trace,
            stop,
        }
    }
}
