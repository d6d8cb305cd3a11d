use super::catalogue::NodeType;
use super::data::NodeData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A bot flow: the graph handed to the Botmother engine.
///
/// These records are the typed view of a document that has already passed
/// validation. Candidate documents produced by the model are held as raw
/// [`serde_json::Value`]s until then, since they may be arbitrarily malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// A single node. Members the engine adds (e.g. `width`, `selected`) survive in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(
        rename = "sourceHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_handle: Option<String>,
    #[serde(
        rename = "targetHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FlowNode {
    /// The catalogue entry for this node, `None` if the tag is unknown.
    pub fn kind(&self) -> Option<NodeType> {
        NodeType::from_tag(&self.node_type)
    }

    pub fn is_trigger(&self) -> bool {
        self.kind().is_some_and(NodeType::is_trigger)
    }

    /// Typed view of `data`, keyed by the node type.
    pub fn typed_data(&self) -> NodeData {
        NodeData::from_parts(&self.node_type, &self.data)
    }
}

impl FlowDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> Value {
        // Every member is a string, number, map or sequence, so this cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter().filter(|n| n.is_trigger())
    }

    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a FlowEdge> {
        self.edges.iter().filter(move |e| e.source == node_id)
    }
}
