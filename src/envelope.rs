use crate::compiler::Compiler;
use crate::context::CallContext;
use crate::error::{CompileError, RenderError};
use crate::flow::{FlowDefinition, FlowRecord, IntoFlow};
use crate::interpreter::speech;
use crate::markup::{Callback, MarkupWriter, Verb};
use crate::script::CompiledScript;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;
use tracing::{error, info, instrument};

/// Served when even the apology document cannot be rendered.
pub const STATIC_FALLBACK_DOCUMENT: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
    "<Response><Say>We&apos;re sorry, an application error has occurred. Goodbye.</Say>",
    "<Hangup/></Response>"
);

pub const CONTENT_TYPE: &str = "text/xml";

/// How a response document came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The flow compiled to a non-empty script.
    Compiled,
    /// No active flow, or the flow produced nothing to say.
    DefaultGreeting,
    /// Input was resumed into a branch with nothing left to run.
    Ended,
    ConfigurationError,
    InternalFailure,
}

/// A complete voice-response document ready for the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceResponse {
    /// Always 200, so the telephony platform never retries a failed flow.
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub outcome: ResponseOutcome,
    /// Where the transport should report call status and usage for this call.
    pub status_callback: String,
    pub script: Option<CompiledScript>,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Inbound,
    Input,
}

/// Picks the compiler for a flow, wraps its output in the response document
/// and turns every failure into a well-formed, terminating response.
#[derive(Debug, Clone, Default)]
pub struct ResponseEnvelope {
    compiler: Compiler,
}

impl ResponseEnvelope {
    pub fn new(compiler: Compiler) -> Self {
        Self { compiler }
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Answers an inbound call. `None` means the number has no active flow.
    #[instrument(skip_all, fields(call_sid = %context.call_sid))]
    pub fn respond<F: IntoFlow>(&self, flow: Option<F>, context: &CallContext) -> VoiceResponse {
        let Some(flow) = flow else {
            info!("no active flow, serving default greeting");
            return self.default_greeting(context);
        };
        let compiled = catch_unwind(AssertUnwindSafe(move || self.compiler.compile_flow(flow)));
        self.finish(compiled, context, Phase::Inbound)
    }

    /// Answers an inbound call for a stored flow record, honouring its active flag.
    pub fn respond_for_record(
        &self,
        record: Option<&FlowRecord>,
        context: &CallContext,
    ) -> VoiceResponse {
        match record.filter(|record| record.is_active) {
            Some(record) => self.respond(Some(record.clone()), context),
            None => self.respond(None::<FlowDefinition>, context),
        }
    }

    /// Answers the gather callback for `block_id` once the caller pressed `digits`.
    #[instrument(skip_all, fields(call_sid = %context.call_sid, block_id = block_id))]
    pub fn respond_to_input<F: IntoFlow>(
        &self,
        flow: F,
        block_id: &str,
        digits: &str,
        context: &CallContext,
    ) -> VoiceResponse {
        let compiled = catch_unwind(AssertUnwindSafe(move || {
            let flow = flow.into_flow().map_err(CompileError::from)?;
            self.compiler.resume(&flow, block_id, digits)
        }));
        self.finish(compiled, context, Phase::Input)
    }

    /// Renders a previously compiled script for one call.
    pub fn render(
        &self,
        script: &CompiledScript,
        context: &CallContext,
    ) -> Result<String, RenderError> {
        MarkupWriter::new(context, self.compiler.options()).render_document(&script.verbs)
    }

    fn finish(
        &self,
        compiled: thread::Result<Result<CompiledScript, CompileError>>,
        context: &CallContext,
        phase: Phase,
    ) -> VoiceResponse {
        let script = match compiled {
            Ok(Ok(script)) => script,
            Ok(Err(e)) => {
                error!(error = %e, "flow configuration error");
                return self.configuration_error(context);
            }
            Err(_) => {
                error!("flow compilation panicked");
                return self.apology(context);
            }
        };

        if script.is_empty() {
            return match phase {
                Phase::Inbound => self.default_greeting(context),
                Phase::Input => self.fixed(vec![Verb::Hangup], ResponseOutcome::Ended, context),
            };
        }

        match self.render(&script, context) {
            Ok(body) => {
                info!(verbs = script.verbs.len(), stop = %script.stop, "flow compiled");
                self.response(body, ResponseOutcome::Compiled, Some(script), context)
            }
            Err(e) => {
                error!(error = %e, "failed to render response");
                self.apology(context)
            }
        }
    }

    fn default_greeting(&self, context: &CallContext) -> VoiceResponse {
        let message = &self.compiler.options().default_greeting;
        self.announce(message, ResponseOutcome::DefaultGreeting, context)
    }

    fn configuration_error(&self, context: &CallContext) -> VoiceResponse {
        let message = &self.compiler.options().configuration_error_message;
        self.announce(message, ResponseOutcome::ConfigurationError, context)
    }

    fn apology(&self, context: &CallContext) -> VoiceResponse {
        let message = &self.compiler.options().apology_message;
        self.announce(message, ResponseOutcome::InternalFailure, context)
    }

    fn announce(
        &self,
        message: &str,
        outcome: ResponseOutcome,
        context: &CallContext,
    ) -> VoiceResponse {
        let options = self.compiler.options();
        let verbs = vec![
            Verb::Say(speech(message, &None, &None, options)),
            Verb::Hangup,
        ];
        self.fixed(verbs, outcome, context)
    }

    fn fixed(
        &self,
        verbs: Vec<Verb>,
        outcome: ResponseOutcome,
        context: &CallContext,
    ) -> VoiceResponse {
        let rendered =
            MarkupWriter::new(context, self.compiler.options()).render_document(&verbs);
        self.response(body_or_static(rendered), outcome, None, context)
    }

    fn response(
        &self,
        body: String,
        outcome: ResponseOutcome,
        script: Option<CompiledScript>,
        context: &CallContext,
    ) -> VoiceResponse {
        VoiceResponse {
            status: 200,
            content_type: CONTENT_TYPE,
            body,
            outcome,
            status_callback: context.callback_url(&Callback::DialStatus, self.compiler.options()),
            script,
        }
    }
}

fn body_or_static(rendered: Result<String, RenderError>) -> String {
    rendered.unwrap_or_else(|e| {
        error!(error = %e, "failed to render fallback response");
        STATIC_FALLBACK_DOCUMENT.to_string()
    })
}
