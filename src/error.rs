use thiserror::Error;

/// Errors raised while reading a persisted flow definition.
#[derive(Error, Debug, Clone)]
pub enum FlowParseError {
    #[error("Failed to parse flow JSON: {0}")]
    JsonParseError(String),

    #[error("Flow definition must be a JSON object, found {0}")]
    UnexpectedShape(&'static str),

    #[error("Block list is malformed: {0}")]
    InvalidBlocks(String),

    #[error("Legacy flow configuration is malformed: {0}")]
    InvalidLegacyConfig(String),
}

/// Errors that can occur while compiling a flow into a script.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error(transparent)]
    Conversion(#[from] FlowConversionError),

    #[error("Block '{block_id}' has an unregistered block type: '{type_name}'")]
    UnknownBlockType { block_id: String, type_name: String },

    #[error("Block '{0}' was not found in the flow")]
    BlockNotFound(String),

    #[error("Input can only be resumed from a graph flow")]
    NotAGraphFlow,
}

/// Errors that can occur while writing the voice-response document.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rendered markup is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors raised when building a call context.
#[derive(Error, Debug, Clone)]
pub enum ContextError {
    #[error("Invalid callback base URL '{url}': {message}")]
    InvalidCallbackBase { url: String, message: String },
}

/// Errors raised when persisting or loading compiled scripts.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Script serialization failed: {0}")]
    Encode(String),

    #[error("Script deserialization failed: {0}")]
    Decode(String),

    #[error("Script file '{path}' could not be accessed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading compiler options.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Could not read options file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse options JSON: {0}")]
    JsonParseError(String),
}

/// Errors that can occur when converting a custom editor format into a `FlowDefinition`.
#[derive(Error, Debug, Clone)]
pub enum FlowConversionError {
    #[error(transparent)]
    Parse(#[from] FlowParseError),

    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
