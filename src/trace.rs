use crate::script::{CompiledScript, TraceStep};
use itertools::Itertools;

/// Formats the traversal of a compiled script into a one-line explanation.
pub struct TraceFormatter;

impl TraceFormatter {
    /// e.g. `welcome (say) -> menu (gather) | awaiting input for 'menu'`
    pub fn format_script(script: &CompiledScript) -> String {
        if script.trace.is_empty() {
            return format!("(no blocks) | {}", script.stop);
        }
        format!("{} | {}", Self::format_steps(&script.trace), script.stop)
    }

    pub fn format_steps(steps: &[TraceStep]) -> String {
        steps
            .iter()
            .map(|step| {
                if step.verbs_emitted == 0 {
                    format!("{} ({}, silent)", step.block_id, step.block_type)
                } else {
                    format!("{} ({})", step.block_id, step.block_type)
                }
            })
            .join(" -> ")
    }
}
