use super::catalogue::NodeType;
use super::definition::{FlowDocument, FlowEdge, FlowNode, Position};
use rand::Rng;
use serde_json::{Map, Value};

const COLUMN_X: f64 = 100.0;
const FIRST_ROW_Y: f64 = 100.0;
const ROW_STEP: f64 = 200.0;

/// Utility to construct a [`FlowDocument`] programmatically.
///
/// Nodes are stacked in a single column in insertion order. Ids are generated
/// when not supplied.
///
/// ```rust
/// use botflow::flow::{FlowBuilder, NodeType};
/// use serde_json::json;
///
/// let mut builder = FlowBuilder::new();
/// let start = builder.add_node(NodeType::CommandTrigger, json!({"command": "/start"}), Some("cmd_start"));
/// let hello = builder.add_node(NodeType::SendTextMessage, json!({"messageText": "Hi!"}), None);
/// builder.connect(&start, &hello, None);
///
/// let flow = builder.build();
/// assert!(botflow::validator::validate_document(&flow.to_value()).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FlowBuilder {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    next_y: f64,
}

impl Default for FlowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_y: FIRST_ROW_Y,
        }
    }

    /// Adds a node and returns its id. Non-object `data` is stored as an empty bag.
    pub fn add_node(&mut self, node_type: NodeType, data: Value, node_id: Option<&str>) -> String {
        let id = node_id.map_or_else(|| generate_id("node"), str::to_string);
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.nodes.push(FlowNode {
            id: id.clone(),
            node_type: node_type.as_str().to_string(),
            data,
            position: Some(Position {
                x: COLUMN_X,
                y: self.next_y,
            }),
            extra: Map::new(),
        });
        self.next_y += ROW_STEP;
        id
    }

    pub fn connect(&mut self, source: &str, target: &str, source_handle: Option<&str>) -> &mut Self {
        self.edges.push(FlowEdge {
            id: Some(generate_id("edge")),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.map(str::to_string),
            target_handle: None,
            edge_type: Some("smart-edge".to_string()),
            extra: Map::new(),
        });
        self
    }

    pub fn build(self) -> FlowDocument {
        FlowDocument {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// `prefix_` followed by eight lowercase hex digits.
fn generate_id(prefix: &str) -> String {
    let suffix: u32 = rand::rng().random();
    format!("{}_{:08x}", prefix, suffix)
}
