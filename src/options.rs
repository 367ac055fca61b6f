use crate::error::OptionsError;
use serde::{Deserialize, Serialize};
use std::fs;

pub const DEFAULT_GREETING: &str =
    "Thank you for calling. This number has not been configured yet. Goodbye.";
pub const NO_INPUT_MESSAGE: &str = "We didn't receive any input. Goodbye!";
pub const CONFIGURATION_ERROR_MESSAGE: &str =
    "We're sorry, this number is not configured correctly. Goodbye.";
pub const APOLOGY_MESSAGE: &str = "We're sorry, an application error has occurred. Goodbye.";

/// Tunables shared by the compiler and the response envelope.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    pub voice: String,
    pub language: String,
    pub default_greeting: String,
    pub no_input_message: String,
    pub configuration_error_message: String,
    pub apology_message: String,
    /// Path segment appended to the callback base for gather results.
    pub gather_path: String,
    pub status_path: String,
    pub recording_path: String,
    pub menu_path: String,
    /// Indent the rendered document.
    pub pretty: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            voice: "alice".to_string(),
            language: "en-US".to_string(),
            default_greeting: DEFAULT_GREETING.to_string(),
            no_input_message: NO_INPUT_MESSAGE.to_string(),
            configuration_error_message: CONFIGURATION_ERROR_MESSAGE.to_string(),
            apology_message: APOLOGY_MESSAGE.to_string(),
            gather_path: "gather".to_string(),
            status_path: "status".to_string(),
            recording_path: "recording".to_string(),
            menu_path: "menu".to_string(),
            pretty: false,
        }
    }
}

impl CompilerOptions {
    /// Load options from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, OptionsError> {
        let content = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(json).map_err(|e| OptionsError::JsonParseError(e.to_string()))
    }
}
