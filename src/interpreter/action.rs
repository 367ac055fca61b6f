use super::registry::BlockType;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_SPEED: f64 = 1.0;
pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 2.0;
pub const DEFAULT_PAUSE_SECONDS: u32 = 2;
pub const DEFAULT_GATHER_DIGITS: u32 = 1;
pub const DEFAULT_GATHER_TIMEOUT: u32 = 10;
pub const DEFAULT_FORWARD_TIMEOUT: u32 = 30;
pub const DEFAULT_HOLD_MUSIC_LOOP: u32 = 10;
pub const DEFAULT_RECORD_MAX_LENGTH: u32 = 300;
pub const DEFAULT_FINISH_ON_KEY: &str = "#";

/// A block's configuration, read into the shape its type expects.
///
/// Missing keys have already been replaced by their defaults; keys without a
/// default stay `None` and make the block emit nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockAction {
    Say(SayBlock),
    Gather(GatherBlock),
    Forward(ForwardBlock),
    Record(RecordBlock),
    Pause { duration: u32 },
    Play { url: Option<String>, loop_count: Option<u32> },
    Sms { message: Option<String>, to: Option<String> },
    Hangup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SayBlock {
    pub text: Option<String>,
    /// Already clamped to `MIN_SPEED..=MAX_SPEED`.
    pub speed: f64,
    pub voice: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatherBlock {
    pub prompt: Option<String>,
    pub num_digits: u32,
    pub timeout: u32,
    /// Digits pressed -> block id to continue with.
    pub routes: BTreeMap<String, String>,
    pub voice: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForwardBlock {
    pub number: Option<String>,
    pub timeout: u32,
    pub hold_music_url: Option<String>,
    pub hold_music_loop: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordBlock {
    pub prompt: Option<String>,
    pub max_length: u32,
    pub finish_on_key: String,
    pub voice: Option<String>,
    pub language: Option<String>,
}

impl BlockAction {
    pub fn parse(block_type: BlockType, config: &Map<String, Value>) -> Self {
        let config = ConfigReader(config);
        match block_type {
            BlockType::Say => BlockAction::Say(SayBlock {
                text: config.text("text"),
                speed: config
                    .number("speed")
                    .unwrap_or(DEFAULT_SPEED)
                    .clamp(MIN_SPEED, MAX_SPEED),
                voice: config.text("voice"),
                language: config.text("language"),
            }),
            BlockType::Gather => BlockAction::Gather(GatherBlock {
                prompt: config.text("prompt"),
                num_digits: config
                    .whole("numDigits")
                    .filter(|digits| *digits > 0)
                    .unwrap_or(DEFAULT_GATHER_DIGITS),
                timeout: config.whole("timeout").unwrap_or(DEFAULT_GATHER_TIMEOUT),
                routes: config.routes("routes"),
                voice: config.text("voice"),
                language: config.text("language"),
            }),
            BlockType::Forward => BlockAction::Forward(ForwardBlock {
                number: config.text("number"),
                timeout: config.whole("timeout").unwrap_or(DEFAULT_FORWARD_TIMEOUT),
                hold_music_url: config.text("holdMusicUrl"),
                hold_music_loop: config
                    .whole("holdMusicLoop")
                    .unwrap_or(DEFAULT_HOLD_MUSIC_LOOP),
            }),
            BlockType::Record => BlockAction::Record(RecordBlock {
                prompt: config.text("prompt"),
                max_length: config.whole("maxLength").unwrap_or(DEFAULT_RECORD_MAX_LENGTH),
                finish_on_key: config
                    .text("finishOnKey")
                    .unwrap_or_else(|| DEFAULT_FINISH_ON_KEY.to_string()),
                voice: config.text("voice"),
                language: config.text("language"),
            }),
            BlockType::Pause => BlockAction::Pause {
                duration: config.whole("duration").unwrap_or(DEFAULT_PAUSE_SECONDS),
            },
            BlockType::Play => BlockAction::Play {
                url: config.text("url"),
                loop_count: config.whole("loop"),
            },
            BlockType::Sms => BlockAction::Sms {
                message: config.text("message"),
                to: config.text("to"),
            },
            BlockType::Hangup => BlockAction::Hangup,
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            BlockAction::Say(_) => BlockType::Say,
            BlockAction::Gather(_) => BlockType::Gather,
            BlockAction::Forward(_) => BlockType::Forward,
            BlockAction::Record(_) => BlockType::Record,
            BlockAction::Pause { .. } => BlockType::Pause,
            BlockAction::Play { .. } => BlockType::Play,
            BlockAction::Sms { .. } => BlockType::Sms,
            BlockAction::Hangup => BlockType::Hangup,
        }
    }
}

impl GatherBlock {
    /// Picks the block to continue with once the caller has pressed `digits`.
    /// An explicit route wins; otherwise the first connection is used.
    pub fn next_block<'a>(&'a self, digits: &str, connections: &'a [String]) -> Option<&'a str> {
        self.routes
            .get(digits.trim())
            .map(String::as_str)
            .or_else(|| connections.first().map(String::as_str))
    }
}

/// Lenient accessors over a block's free-form config.
struct ConfigReader<'a>(&'a Map<String, Value>);

impl ConfigReader<'_> {
    /// Non-empty text. Numbers are accepted too, phone numbers are often stored that way.
    fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        let number = match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|n| n.is_finite())
    }

    fn whole(&self, key: &str) -> Option<u32> {
        self.number(key)
            .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n.round() as u32)
    }

    fn routes(&self, key: &str) -> BTreeMap<String, String> {
        match self.0.get(key) {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(digits, target)| {
                    target.as_str().map(|id| (digits.clone(), id.to_string()))
                })
                .collect(),
            _ => BTreeMap::new(),
        }
    }
}
