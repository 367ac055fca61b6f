use crate::error::ScriptError;
use crate::interpreter::BlockType;
use crate::markup::Verb;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

/// The output of one compilation, independent of any particular call.
///
/// Rendering it against a `CallContext` produces the voice-response document,
/// so a script may be compiled once when a flow is saved and reused per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledScript {
    pub format: FlowFormat,
    /// Id of the block traversal started from.
    pub entry: Option<String>,
    pub verbs: Vec<Verb>,
    pub trace: Vec<TraceStep>,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowFormat {
    Graph,
    Legacy,
}

/// One visited block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub block_id: String,
    pub block_type: BlockType,
    pub verbs_emitted: usize,
}

/// Why traversal ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// There was no block to start from.
    EmptyFlow,
    Hangup { block_id: String },
    AwaitingInput { block_id: String },
    /// The last block has no connections.
    EndOfFlow { block_id: String },
    DanglingConnection { block_id: String, target: String },
    /// The next block had already been emitted.
    Revisited { block_id: String, target: String },
    /// Legacy flows run their fixed sequence to the end.
    LegacySequence,
}

impl CompiledScript {
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ScriptError> {
        encode_to_vec(self, standard()).map_err(|e| ScriptError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        decode_from_slice(bytes, standard())
            .map(|(script, _)| script)
            .map_err(|e| ScriptError::Decode(e.to_string()))
    }

    /// Saves the script to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ScriptError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|source| ScriptError::Io {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_file(path: &str) -> Result<Self, ScriptError> {
        let bytes = fs::read(path).map_err(|source| ScriptError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EmptyFlow => write!(f, "empty flow"),
            StopReason::Hangup { block_id } => write!(f, "hangup at '{}'", block_id),
            StopReason::AwaitingInput { block_id } => {
                write!(f, "awaiting input for '{}'", block_id)
            }
            StopReason::EndOfFlow { block_id } => write!(f, "end of flow at '{}'", block_id),
            StopReason::DanglingConnection { block_id, target } => {
                write!(f, "'{}' connects to missing block '{}'", block_id, target)
            }
            StopReason::Revisited { block_id, target } => {
                write!(f, "'{}' loops back to '{}'", block_id, target)
            }
            StopReason::LegacySequence => write!(f, "legacy sequence complete"),
        }
    }
}
