use crate::error::CompileError;
use crate::flow::BlockDefinition;
use crate::markup::{
    Callback, Dial, Gather, Playback, Recipient, Recording, Speech, TextReply, Verb,
};
use crate::options::CompilerOptions;

mod action;
mod registry;

pub use action::*;
pub use registry::{BlockRegistry, BlockType};

/// What the compiler should do after a block has been emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Follow the block's first connection.
    Next,
    /// The call ends here.
    Terminate,
    /// Control passes to whoever receives the gather callback.
    AwaitInput,
}

/// The result of interpreting one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub fragment: Vec<Verb>,
    pub continuation: Continuation,
}

impl Step {
    fn next(fragment: Vec<Verb>) -> Self {
        Self {
            fragment,
            continuation: Continuation::Next,
        }
    }
}

/// Resolves a block's type and reads its config.
pub fn parse_block(
    block: &BlockDefinition,
    registry: &BlockRegistry,
) -> Result<BlockAction, CompileError> {
    let block_type = registry.resolve(&block.block_type).ok_or_else(|| {
        CompileError::UnknownBlockType {
            block_id: block.id.clone(),
            type_name: block.block_type.clone(),
        }
    })?;
    Ok(BlockAction::parse(block_type, &block.config))
}

/// Translates one block into its markup fragment and continuation.
///
/// Blocks missing a required config value produce an empty fragment but keep
/// their usual continuation.
pub fn interpret(block_id: &str, action: &BlockAction, options: &CompilerOptions) -> Step {
    match action {
        BlockAction::Say(say) => {
            let fragment = say
                .text
                .as_ref()
                .map(|text| {
                    let mut speech = speech(text, &say.voice, &say.language, options);
                    speech.rate = speech_rate(say.speed);
                    Verb::Say(speech)
                })
                .into_iter()
                .collect();
            Step::next(fragment)
        }
        BlockAction::Pause { duration } => Step::next(vec![Verb::Pause { length: *duration }]),
        BlockAction::Gather(gather) => {
            let fragment = match &gather.prompt {
                Some(prompt) => vec![
                    Verb::Gather(Gather {
                        num_digits: gather.num_digits,
                        timeout: gather.timeout,
                        action: Callback::Gather {
                            block_id: block_id.to_string(),
                        },
                        prompt: Some(speech(prompt, &gather.voice, &gather.language, options)),
                    }),
                    Verb::Say(speech(&options.no_input_message, &None, &None, options)),
                    Verb::Hangup,
                ],
                None => Vec::new(),
            };
            Step {
                fragment,
                continuation: Continuation::AwaitInput,
            }
        }
        BlockAction::Forward(forward) => {
            let fragment = forward
                .number
                .as_ref()
                .map(|number| {
                    Verb::Dial(Dial {
                        number: number.clone(),
                        timeout: forward.timeout,
                        hold_music: forward.hold_music_url.as_ref().map(|url| Playback {
                            url: url.clone(),
                            loop_count: Some(forward.hold_music_loop),
                        }),
                        status_callback: Callback::DialStatus,
                    })
                })
                .into_iter()
                .collect();
            Step::next(fragment)
        }
        BlockAction::Record(record) => {
            let mut fragment = Vec::with_capacity(2);
            if let Some(prompt) = &record.prompt {
                fragment.push(Verb::Say(speech(
                    prompt,
                    &record.voice,
                    &record.language,
                    options,
                )));
            }
            fragment.push(Verb::Record(Recording {
                max_length: record.max_length,
                finish_on_key: record.finish_on_key.clone(),
                transcribe: true,
                callback: Callback::RecordingStatus,
            }));
            Step::next(fragment)
        }
        BlockAction::Play { url, loop_count } => {
            let fragment = url
                .as_ref()
                .map(|url| {
                    Verb::Play(Playback {
                        url: url.clone(),
                        loop_count: *loop_count,
                    })
                })
                .into_iter()
                .collect();
            Step::next(fragment)
        }
        BlockAction::Sms { message, to } => {
            let fragment = message
                .as_ref()
                .map(|body| {
                    Verb::Sms(TextReply {
                        to: to
                            .as_ref()
                            .map_or(Recipient::Caller, |number| Recipient::Number(number.clone())),
                        body: body.clone(),
                    })
                })
                .into_iter()
                .collect();
            Step::next(fragment)
        }
        BlockAction::Hangup => Step {
            fragment: vec![Verb::Hangup],
            continuation: Continuation::Terminate,
        },
    }
}

/// Builds spoken text with the block's voice settings or the configured defaults.
pub fn speech(
    text: &str,
    voice: &Option<String>,
    language: &Option<String>,
    options: &CompilerOptions,
) -> Speech {
    Speech {
        text: text.to_string(),
        voice: voice.clone().unwrap_or_else(|| options.voice.clone()),
        language: language.clone().unwrap_or_else(|| options.language.clone()),
        rate: None,
    }
}

/// Maps a clamped speed multiplier onto a percentage rate; normal speed has none.
fn speech_rate(speed: f64) -> Option<u32> {
    let percent = (speed.clamp(MIN_SPEED, MAX_SPEED) * 100.0).round() as u32;
    (percent != 100).then_some(percent)
}
