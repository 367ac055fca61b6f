use serde::{Deserialize, Serialize};
use std::fmt;

/// One instruction of the voice-response vocabulary.
///
/// Verbs never carry resolved URLs or phone numbers taken from the live call;
/// those are kept symbolic (`Callback`, `Recipient`) and filled in when the
/// document is rendered against a `CallContext`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Verb {
    Say(Speech),
    Pause { length: u32 },
    Gather(Gather),
    Dial(Dial),
    Play(Playback),
    Record(Recording),
    Sms(TextReply),
    Hangup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speech {
    pub text: String,
    pub voice: String,
    pub language: String,
    /// Speaking rate in percent, `None` when the block uses normal speed.
    pub rate: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gather {
    pub num_digits: u32,
    pub timeout: u32,
    pub action: Callback,
    pub prompt: Option<Speech>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dial {
    pub number: String,
    pub timeout: u32,
    pub hold_music: Option<Playback>,
    pub status_callback: Callback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub url: String,
    pub loop_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub max_length: u32,
    pub finish_on_key: String,
    pub transcribe: bool,
    pub callback: Callback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextReply {
    pub to: Recipient,
    pub body: String,
}

/// Where the telephony platform should report back to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Callback {
    /// Digits collected by the gather block with this id.
    Gather { block_id: String },
    DialStatus,
    RecordingStatus,
    /// The single menu action of a legacy flow.
    Menu,
    /// A user-configured URL, or a path under the callback base.
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    /// Whoever placed the inbound call.
    Caller,
    Number(String),
}

impl Verb {
    /// The element name this verb renders as.
    pub fn tag(&self) -> &'static str {
        match self {
            Verb::Say(_) => "Say",
            Verb::Pause { .. } => "Pause",
            Verb::Gather(_) => "Gather",
            Verb::Dial(_) => "Dial",
            Verb::Play(_) => "Play",
            Verb::Record(_) => "Record",
            Verb::Sms(_) => "Sms",
            Verb::Hangup => "Hangup",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Verb::Hangup)
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Gather { block_id } => write!(f, "gather({})", block_id),
            Callback::DialStatus => write!(f, "dial-status"),
            Callback::RecordingStatus => write!(f, "recording-status"),
            Callback::Menu => write!(f, "menu"),
            Callback::Custom(target) => write!(f, "{}", target),
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Caller => write!(f, "$caller"),
            Recipient::Number(number) => write!(f, "{}", number),
        }
    }
}
