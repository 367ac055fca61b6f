use crate::flow::LegacyFlowConfig;
use crate::interpreter::{
    DEFAULT_FINISH_ON_KEY, DEFAULT_FORWARD_TIMEOUT, DEFAULT_GATHER_DIGITS, DEFAULT_GATHER_TIMEOUT,
    DEFAULT_RECORD_MAX_LENGTH, speech,
};
use crate::markup::{Callback, Dial, Gather, Recording, Verb};
use crate::options::CompilerOptions;

/// Compiles the flat legacy format: greeting, menu, voicemail, forward.
/// Absent or empty sections contribute nothing.
pub(super) fn compile_legacy(config: &LegacyFlowConfig, options: &CompilerOptions) -> Vec<Verb> {
    let mut verbs = Vec::new();

    if let Some(greeting) = non_empty(&config.greeting) {
        verbs.push(Verb::Say(speech(greeting, &None, &None, options)));
    }

    if let Some(menu) = &config.menu {
        if let Some(prompt) = non_empty(&menu.prompt) {
            let action = non_empty(&menu.action)
                .map_or(Callback::Menu, |action| Callback::Custom(action.to_string()));
            verbs.push(Verb::Gather(Gather {
                num_digits: DEFAULT_GATHER_DIGITS,
                timeout: DEFAULT_GATHER_TIMEOUT,
                action,
                prompt: Some(speech(prompt, &None, &None, options)),
            }));
        }
    }

    if let Some(voicemail) = &config.voicemail {
        if let Some(prompt) = non_empty(&voicemail.prompt) {
            verbs.push(Verb::Say(speech(prompt, &None, &None, options)));
        }
        let callback = non_empty(&voicemail.callback).map_or(Callback::RecordingStatus, |url| {
            Callback::Custom(url.to_string())
        });
        verbs.push(Verb::Record(Recording {
            max_length: DEFAULT_RECORD_MAX_LENGTH,
            finish_on_key: DEFAULT_FINISH_ON_KEY.to_string(),
            transcribe: true,
            callback,
        }));
    }

    if let Some(number) = config
        .forward
        .as_ref()
        .and_then(|forward| non_empty(&forward.number))
    {
        verbs.push(Verb::Dial(Dial {
            number: number.to_string(),
            timeout: DEFAULT_FORWARD_TIMEOUT,
            hold_music: None,
            status_callback: Callback::DialStatus,
        }));
    }

    verbs
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
