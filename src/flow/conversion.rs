use super::definition::{FlowDefinition, FlowRecord};
use crate::error::FlowConversionError;
use serde_json::Value;

/// A trait for stored or custom flow formats that can be converted into a `FlowDefinition`.
///
/// The response envelope accepts anything implementing this trait, so a
/// caller holding flows in its own editor format only needs a translation
/// layer into the canonical block list.
///
/// # Example
///
/// ```rust,no_run
/// use ringflow::flow::{BlockDefinition, FlowDefinition, GraphFlow, IntoFlow};
/// use ringflow::error::FlowConversionError;
///
/// struct EditorNode { key: String, kind: String, next: Option<String> }
/// struct EditorExport { nodes: Vec<EditorNode> }
///
/// impl IntoFlow for EditorExport {
///     fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
///         let blocks = self
///             .nodes
///             .into_iter()
///             .map(|node| BlockDefinition {
///                 id: node.key,
///                 block_type: node.kind,
///                 config: Default::default(),
///                 connections: node.next.into_iter().collect(),
///                 position: None,
///             })
///             .collect();
///         Ok(FlowDefinition::Graph(GraphFlow { blocks }))
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a compilable flow.
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError>;
}

impl IntoFlow for FlowDefinition {
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
        Ok(self)
    }
}

impl IntoFlow for Value {
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
        Ok(FlowDefinition::from_value(self)?)
    }
}

impl IntoFlow for &str {
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
        Ok(FlowDefinition::from_json(self)?)
    }
}

impl IntoFlow for FlowRecord {
    fn into_flow(self) -> Result<FlowDefinition, FlowConversionError> {
        Ok(FlowDefinition::from_value(self.definition)?)
    }
}
