use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// Where an edge sits in the document: its `id` when it has one, its index otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeRef {
    Id(String),
    Index(usize),
}

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeRef::Id(id) => f.write_str(id),
            EdgeRef::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Which end of an edge a dangling reference was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Source => "source",
            Endpoint::Target => "target",
        })
    }
}

/// A single structural problem in a flow document.
///
/// The `Display` text is what gets fed back to the model during repair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Flow must be a JSON object")]
    NotAnObject,

    #[error("Missing or invalid '{0}' array")]
    MissingArray(&'static str),

    #[error("Flow has no nodes")]
    NoNodes,

    #[error("Node at index {index} has no 'id'")]
    MissingNodeId { index: usize },

    #[error("Node '{node_id}' has no 'type'")]
    MissingNodeType { node_id: String },

    #[error("Duplicate node ID: '{node_id}'")]
    DuplicateNodeId { node_id: String },

    #[error("Node '{node_id}': unknown type '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' ({type_name}): 'data' must be an object")]
    InvalidNodeData { node_id: String, type_name: String },

    #[error("Node '{node_id}' ({type_name}): missing required field '{field}'")]
    MissingRequiredField {
        node_id: String,
        type_name: String,
        field: &'static str,
    },

    #[error("Node '{node_id}': missing 'position'")]
    MissingPosition { node_id: String },

    #[error(
        "Flow must have at least one trigger node (CommandTriggerNode, MessageTriggerNode, etc.)"
    )]
    NoTrigger,

    #[error("Edge at index {index}: missing 'source' or 'target'")]
    MissingEndpoint { index: usize },

    #[error("Duplicate edge ID: '{edge_id}'")]
    DuplicateEdgeId { edge_id: String },

    #[error("Edge '{edge}': {endpoint} '{node_id}' does not exist")]
    DanglingReference {
        edge: EdgeRef,
        endpoint: Endpoint,
        node_id: String,
    },

    #[error("Edge '{edge}': invalid sourceHandle '{handle}' for {type_name} (valid: {})", join_sorted(.allowed))]
    InvalidHandle {
        edge: EdgeRef,
        handle: String,
        type_name: String,
        allowed: &'static [&'static str],
    },

    #[error("Node '{node_id}' ({type_name}): conditional node has no outgoing edges")]
    ConditionalWithoutOutgoing { node_id: String, type_name: String },

    #[error("Node '{node_id}' ({type_name}): trigger node has no outgoing edges")]
    TriggerWithoutOutgoing { node_id: String, type_name: String },
}

impl Defect {
    /// Defects that stop validation before any per-node checks run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Defect::InvalidJson(_) | Defect::NotAnObject | Defect::MissingArray(_) | Defect::NoNodes
        )
    }
}

fn join_sorted(handles: &[&str]) -> String {
    handles.iter().sorted().join(", ")
}

/// Formats defects one per line, ready to be quoted in a repair prompt.
pub fn format_defects(defects: &[Defect]) -> String {
    defects.iter().map(|d| format!("- {}", d)).join("\n")
}
