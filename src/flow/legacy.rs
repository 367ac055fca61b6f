use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The pre-graph flow format: a fixed greeting, menu, voicemail, forward sequence.
///
/// Text fields accept JSON numbers as well, as block configs do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyFlowConfig {
    #[serde(deserialize_with = "text_or_number")]
    pub greeting: Option<String>,
    pub menu: Option<LegacyMenu>,
    pub voicemail: Option<LegacyVoicemail>,
    pub forward: Option<LegacyForward>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyMenu {
    #[serde(deserialize_with = "text_or_number")]
    pub prompt: Option<String>,
    /// Menu choices. Interpreted by whoever handles `action`, not by the compiler.
    pub options: Value,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyVoicemail {
    #[serde(deserialize_with = "text_or_number")]
    pub prompt: Option<String>,
    pub callback: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyForward {
    #[serde(deserialize_with = "text_or_number")]
    pub number: Option<String>,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected text or a number, found {}",
            other
        ))),
    }
}
