use super::legacy::LegacyFlowConfig;
use crate::error::FlowParseError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single node of a call flow as it is persisted by the editor.
///
/// `block_type` stays a plain string here; it is resolved against the block
/// registry only when the compiler visits the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Map<String, Value>,
    /// Ordered successor ids. Only the first one is followed by the compiler.
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: Vec<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

/// Editor canvas coordinates. Never read by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFlow {
    pub blocks: Vec<BlockDefinition>,
}

/// The two persisted flow formats, told apart once when the flow is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowDefinition {
    Graph(GraphFlow),
    Legacy(LegacyFlowConfig),
}

/// A stored flow as the surrounding system keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub version: u32,
    #[serde(alias = "phoneNumber")]
    pub phone_number: String,
    #[serde(default, alias = "isActive")]
    pub is_active: bool,
    pub definition: Value,
}

impl FlowDefinition {
    pub fn from_json(json: &str) -> Result<Self, FlowParseError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| FlowParseError::JsonParseError(e.to_string()))?;
        Self::from_value(value)
    }

    /// Detects the format of a raw definition.
    ///
    /// A non-empty `blocks` array selects the graph format; any other object is
    /// read as a legacy config. A definition stored as a JSON string is
    /// decoded one more time.
    pub fn from_value(value: Value) -> Result<Self, FlowParseError> {
        match value {
            Value::String(encoded) => {
                let inner: Value = serde_json::from_str(&encoded)
                    .map_err(|e| FlowParseError::JsonParseError(e.to_string()))?;
                match inner {
                    Value::Object(map) => Self::from_object(map),
                    other => Err(FlowParseError::UnexpectedShape(kind_of(&other))),
                }
            }
            Value::Object(map) => Self::from_object(map),
            other => Err(FlowParseError::UnexpectedShape(kind_of(&other))),
        }
    }

    fn from_object(mut map: Map<String, Value>) -> Result<Self, FlowParseError> {
        match map.get("blocks") {
            Some(Value::Array(blocks)) if !blocks.is_empty() => {
                let blocks = map.remove("blocks").unwrap_or_default();
                let blocks: Vec<BlockDefinition> = serde_json::from_value(blocks)
                    .map_err(|e| FlowParseError::InvalidBlocks(e.to_string()))?;
                return Ok(FlowDefinition::Graph(GraphFlow { blocks }));
            }
            Some(Value::Array(_)) | Some(Value::Null) | None => {}
            Some(other) => {
                return Err(FlowParseError::InvalidBlocks(format!(
                    "expected an array, found {}",
                    kind_of(other)
                )));
            }
        }

        let legacy: LegacyFlowConfig = serde_json::from_value(Value::Object(map))
            .map_err(|e| FlowParseError::InvalidLegacyConfig(e.to_string()))?;
        Ok(FlowDefinition::Legacy(legacy))
    }

    pub fn is_graph(&self) -> bool {
        matches!(self, FlowDefinition::Graph(_))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
