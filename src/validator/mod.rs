//! Structural validation of flow documents.
//!
//! Validation never fails: every problem becomes a [`Defect`], and an empty
//! list means the document is safe to hand to the engine. Checks run in a
//! fixed order (document shape, nodes, entry point, edges, outgoing routes) so
//! the same document always yields the same list.

use crate::flow::NodeType;
use ahash::{AHashMap, AHashSet};
use serde_json::{Map, Value};

mod defect;

pub use defect::{Defect, EdgeRef, Endpoint, format_defects};

/// Validates a JSON string. Unparseable input yields a single [`Defect::InvalidJson`].
pub fn validate_flow(json: &str) -> Vec<Defect> {
    match serde_json::from_str::<Value>(json) {
        Ok(document) => validate_document(&document),
        Err(e) => vec![Defect::InvalidJson(e.to_string())],
    }
}

/// Validates an already-parsed document.
pub fn validate_document(document: &Value) -> Vec<Defect> {
    let Some(flow) = document.as_object() else {
        return vec![Defect::NotAnObject];
    };

    let nodes = flow.get("nodes").and_then(Value::as_array);
    let edges = flow.get("edges").and_then(Value::as_array);

    let mut defects = Vec::new();
    if nodes.is_none() {
        defects.push(Defect::MissingArray("nodes"));
    }
    if edges.is_none() {
        defects.push(Defect::MissingArray("edges"));
    }
    let (Some(nodes), Some(edges)) = (nodes, edges) else {
        return defects;
    };

    if nodes.is_empty() {
        return vec![Defect::NoNodes];
    }

    let mut pass = ValidationPass::default();
    pass.check_nodes(nodes);
    pass.check_entry_point();
    pass.check_edges(edges);
    pass.check_outgoing_routes();
    pass.defects
}

/// A node that survived the id/type checks.
struct DeclaredNode {
    id: String,
    type_name: String,
    kind: Option<NodeType>,
}

/// Lookup tables for a single validation call, dropped when it returns.
#[derive(Default)]
struct ValidationPass {
    defects: Vec<Defect>,
    /// First declaration of each node id, in document order.
    declared: Vec<DeclaredNode>,
    by_id: AHashMap<String, usize>,
    duplicate_nodes: AHashSet<String>,
    edge_ids: AHashSet<String>,
    duplicate_edges: AHashSet<String>,
    outgoing: AHashMap<String, usize>,
    has_trigger: bool,
}

impl ValidationPass {
    fn check_nodes(&mut self, nodes: &[Value]) {
        for (index, node) in nodes.iter().enumerate() {
            let empty = Map::new();
            let node = node.as_object().unwrap_or(&empty);

            let Some(id) = key_of(node.get("id")) else {
                self.defects.push(Defect::MissingNodeId { index });
                continue;
            };
            let Some(type_name) = key_of(node.get("type")) else {
                self.defects.push(Defect::MissingNodeType { node_id: id });
                continue;
            };

            let kind = NodeType::from_tag(&type_name);
            if self.by_id.contains_key(&id) {
                // One report per repeated id, however many copies there are.
                if self.duplicate_nodes.insert(id.clone()) {
                    self.defects.push(Defect::DuplicateNodeId {
                        node_id: id.clone(),
                    });
                }
            } else {
                self.by_id.insert(id.clone(), self.declared.len());
                self.declared.push(DeclaredNode {
                    id: id.clone(),
                    type_name: type_name.clone(),
                    kind,
                });
            }

            match kind {
                Some(ty) => self.has_trigger |= ty.is_trigger(),
                None => self.defects.push(Defect::UnknownNodeType {
                    node_id: id.clone(),
                    type_name: type_name.clone(),
                }),
            }

            if !node.contains_key("position") {
                self.defects.push(Defect::MissingPosition {
                    node_id: id.clone(),
                });
            }

            self.check_data(node, &id, &type_name, kind);
        }
    }

    fn check_data(
        &mut self,
        node: &Map<String, Value>,
        id: &str,
        type_name: &str,
        kind: Option<NodeType>,
    ) {
        let empty = Map::new();
        let data = match node.get("data") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(_) => {
                self.defects.push(Defect::InvalidNodeData {
                    node_id: id.to_string(),
                    type_name: type_name.to_string(),
                });
                return;
            }
        };

        let Some(ty) = kind else { return };
        for &field in ty.required_fields() {
            if is_blank(data.get(field)) {
                self.defects.push(Defect::MissingRequiredField {
                    node_id: id.to_string(),
                    type_name: type_name.to_string(),
                    field,
                });
            }
        }
    }

    fn check_entry_point(&mut self) {
        if !self.has_trigger {
            self.defects.push(Defect::NoTrigger);
        }
    }

    fn check_edges(&mut self, edges: &[Value]) {
        for (index, edge) in edges.iter().enumerate() {
            let empty = Map::new();
            let edge = edge.as_object().unwrap_or(&empty);

            let (Some(source), Some(target)) =
                (key_of(edge.get("source")), key_of(edge.get("target")))
            else {
                self.defects.push(Defect::MissingEndpoint { index });
                continue;
            };

            let edge_id = key_of(edge.get("id"));
            if let Some(edge_id) = &edge_id {
                if !self.edge_ids.insert(edge_id.clone())
                    && self.duplicate_edges.insert(edge_id.clone())
                {
                    self.defects.push(Defect::DuplicateEdgeId {
                        edge_id: edge_id.clone(),
                    });
                }
            }
            let edge_ref = edge_id.map_or(EdgeRef::Index(index), EdgeRef::Id);

            let source_node = self.by_id.get(&source).copied();
            if source_node.is_none() {
                self.defects.push(Defect::DanglingReference {
                    edge: edge_ref.clone(),
                    endpoint: Endpoint::Source,
                    node_id: source.clone(),
                });
            }
            if !self.by_id.contains_key(&target) {
                self.defects.push(Defect::DanglingReference {
                    edge: edge_ref.clone(),
                    endpoint: Endpoint::Target,
                    node_id: target.clone(),
                });
            }

            let Some(source_index) = source_node else {
                continue;
            };
            *self.outgoing.entry(source).or_default() += 1;

            let handle = edge
                .get("sourceHandle")
                .and_then(Value::as_str)
                .filter(|h| !h.is_empty());
            let declared = &self.declared[source_index];
            let vocabulary = declared.kind.and_then(NodeType::handle_vocabulary);
            if let (Some(handle), Some(allowed)) = (handle, vocabulary) {
                if !allowed.contains(&handle) {
                    self.defects.push(Defect::InvalidHandle {
                        edge: edge_ref,
                        handle: handle.to_string(),
                        type_name: declared.type_name.clone(),
                        allowed,
                    });
                }
            }
        }
    }

    fn check_outgoing_routes(&mut self) {
        let routes = |node: &DeclaredNode| self.outgoing.get(&node.id).copied().unwrap_or(0);

        let mut stranded = Vec::new();
        for node in &self.declared {
            if node.kind.is_some_and(NodeType::is_conditional) && routes(node) == 0 {
                stranded.push(Defect::ConditionalWithoutOutgoing {
                    node_id: node.id.clone(),
                    type_name: node.type_name.clone(),
                });
            }
        }
        for node in &self.declared {
            if node.kind.is_some_and(NodeType::is_trigger) && routes(node) == 0 {
                stranded.push(Defect::TriggerWithoutOutgoing {
                    node_id: node.id.clone(),
                    type_name: node.type_name.clone(),
                });
            }
        }
        self.defects.extend(stranded);
    }
}

/// Ids and type tags: non-empty strings, or numbers rendered as text.
fn key_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
