//! Validator tests
//!
//! Structural checks over whole documents, from fatal shape problems down to
//! per-edge handle checks.
mod common;
use botflow::prelude::*;
use botflow::validator::{EdgeRef, Endpoint};
use common::*;
use serde_json::json;

#[cfg(test)]
mod document_shape_tests {
    use super::*;

    #[test]
    fn test_valid_flows_have_no_defects() {
        assert!(validate_document(&order_bot_flow()).is_empty());
        assert!(validate_document(&minimal_flow()).is_empty());
    }

    #[test]
    fn test_unparseable_text_is_a_single_defect() {
        let defects = validate_flow("{\"nodes\": [");
        assert_eq!(defects.len(), 1);
        assert!(matches!(defects[0], Defect::InvalidJson(_)));
        assert!(defects[0].is_fatal());
    }

    #[test]
    fn test_non_object_document() {
        assert_eq!(validate_flow("[1, 2, 3]"), vec![Defect::NotAnObject]);
    }

    #[test]
    fn test_missing_nodes_array_only() {
        let defects = validate_document(&json!({"edges": []}));
        assert_eq!(defects, vec![Defect::MissingArray("nodes")]);
    }

    #[test]
    fn test_edges_that_are_not_an_array() {
        let mut flow = minimal_flow();
        flow["edges"] = json!({"e1": {}});
        assert_eq!(validate_document(&flow), vec![Defect::MissingArray("edges")]);
    }

    #[test]
    fn test_empty_node_list() {
        let defects = validate_document(&json!({"nodes": [], "edges": []}));
        assert_eq!(defects, vec![Defect::NoNodes]);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let flow = json!({
            "nodes": [
                {"id": "a", "type": "IfConditionNode"},
                {"id": "a", "type": "TeleportNode", "position": {"x": 0, "y": 0}},
                {"type": "SendTextMessageNode"}
            ],
            "edges": [{"source": "a", "target": "nowhere", "sourceHandle": "maybe"}]
        });
        let first = validate_document(&flow);
        assert!(!first.is_empty());
        for _ in 0..5 {
            assert_eq!(validate_document(&flow), first);
        }
    }

    #[test]
    fn test_string_and_parsed_entry_points_agree() {
        let flow = flow_missing_position();
        let text = serde_json::to_string(&flow).unwrap();
        assert_eq!(validate_flow(&text), validate_document(&flow));
    }
}

#[cfg(test)]
mod node_tests {
    use super::*;

    #[test]
    fn test_repeated_id_is_reported_once() {
        let mut flow = minimal_flow();
        let copy = flow["nodes"][1].clone();
        if let Some(nodes) = flow["nodes"].as_array_mut() {
            nodes.push(copy.clone());
            nodes.push(copy);
        }

        let duplicates: Vec<_> = validate_document(&flow)
            .into_iter()
            .filter(|d| matches!(d, Defect::DuplicateNodeId { .. }))
            .collect();
        assert_eq!(
            duplicates,
            vec![Defect::DuplicateNodeId {
                node_id: "send_welcome".to_string()
            }]
        );
    }

    #[test]
    fn test_per_node_defects_follow_check_order() {
        let mut flow = minimal_flow();
        if let Some(nodes) = flow["nodes"].as_array_mut() {
            nodes.push(json!({"id": "send_welcome", "type": "TeleportNode"}));
        }

        assert_eq!(
            validate_document(&flow),
            vec![
                Defect::DuplicateNodeId {
                    node_id: "send_welcome".to_string()
                },
                Defect::UnknownNodeType {
                    node_id: "send_welcome".to_string(),
                    type_name: "TeleportNode".to_string()
                },
                Defect::MissingPosition {
                    node_id: "send_welcome".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_nodes_without_id_or_type() {
        let flow = json!({
            "nodes": [
                {"id": "cmd_start", "type": "CommandTriggerNode", "data": {"command": "/start"}, "position": {"x": 0, "y": 0}},
                {"type": "SendTextMessageNode", "position": {"x": 0, "y": 200}},
                {"id": "", "type": "SendTextMessageNode"},
                "not a node",
                {"id": "untyped", "position": {"x": 0, "y": 400}}
            ],
            "edges": [{"id": "e1", "source": "cmd_start", "target": "untyped"}]
        });

        assert_eq!(
            validate_document(&flow),
            vec![
                Defect::MissingNodeId { index: 1 },
                Defect::MissingNodeId { index: 2 },
                Defect::MissingNodeId { index: 3 },
                Defect::MissingNodeType {
                    node_id: "untyped".to_string()
                },
                // A node without a type is never declared, so edges cannot reach it.
                Defect::DanglingReference {
                    edge: EdgeRef::Id("e1".to_string()),
                    endpoint: Endpoint::Target,
                    node_id: "untyped".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let flow = json!({
            "nodes": [
                {"id": 1, "type": "CommandTriggerNode", "data": {"command": "/start"}, "position": {"x": 0, "y": 0}},
                {"id": 2, "type": "SendTextMessageNode", "data": {"messageText": "Hi"}, "position": {"x": 0, "y": 200}}
            ],
            "edges": [{"id": 10, "source": 1, "target": 2}]
        });
        assert!(validate_document(&flow).is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let flow = json!({
            "nodes": [
                {"id": "cmd_start", "type": "CommandTriggerNode", "data": {"command": ""}, "position": {"x": 0, "y": 0}},
                {"id": "call_api", "type": "HTTPRequestNode", "data": {"method": "GET", "url": null}, "position": {"x": 0, "y": 200}},
                {"id": "no_data", "type": "SendTextMessageNode", "position": {"x": 0, "y": 400}}
            ],
            "edges": [
                {"id": "e1", "source": "cmd_start", "target": "call_api"},
                {"id": "e2", "source": "call_api", "target": "no_data"}
            ]
        });

        let missing: Vec<(String, &str)> = validate_document(&flow)
            .into_iter()
            .filter_map(|d| match d {
                Defect::MissingRequiredField { node_id, field, .. } => Some((node_id, field)),
                _ => None,
            })
            .collect();
        assert_eq!(
            missing,
            vec![
                ("cmd_start".to_string(), "command"),
                ("call_api".to_string(), "url"),
                ("no_data".to_string(), "messageText"),
            ]
        );
    }

    #[test]
    fn test_zero_and_false_satisfy_required_fields() {
        let flow = json!({
            "nodes": [
                {"id": "cmd_start", "type": "CommandTriggerNode", "data": {"command": "/start"}, "position": {"x": 0, "y": 0}},
                {"id": "wait", "type": "DelayNode", "data": {"delay": 0}, "position": {"x": 0, "y": 200}},
                {"id": "where", "type": "SendLocationNode", "data": {"latitude": 0.0, "longitude": 0.0}, "position": {"x": 0, "y": 400}}
            ],
            "edges": [
                {"id": "e1", "source": "cmd_start", "target": "wait"},
                {"id": "e2", "source": "wait", "target": "where"}
            ]
        });
        assert!(validate_document(&flow).is_empty());
    }

    #[test]
    fn test_non_object_data_is_reported_once() {
        let mut flow = minimal_flow();
        flow["nodes"][1]["data"] = json!("Hello!");
        assert_eq!(
            validate_document(&flow),
            vec![Defect::InvalidNodeData {
                node_id: "send_welcome".to_string(),
                type_name: "SendTextMessageNode".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_position_names_the_node() {
        let defects = validate_document(&flow_missing_position());
        assert_eq!(
            defects,
            vec![Defect::MissingPosition {
                node_id: "send_welcome".to_string()
            }]
        );
        assert_eq!(defects[0].to_string(), "Node 'send_welcome': missing 'position'");
    }
}

#[cfg(test)]
mod entry_point_tests {
    use super::*;

    #[test]
    fn test_lone_conditional_node() {
        let flow = json!({
            "nodes": [{"id": "if_1", "type": "IfConditionNode", "data": {}, "position": {"x": 0, "y": 0}}],
            "edges": []
        });
        assert_eq!(
            validate_document(&flow),
            vec![
                Defect::NoTrigger,
                Defect::ConditionalWithoutOutgoing {
                    node_id: "if_1".to_string(),
                    type_name: "IfConditionNode".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_trigger_without_outgoing_edge() {
        let mut flow = minimal_flow();
        flow["edges"] = json!([]);
        assert_eq!(
            validate_document(&flow),
            vec![Defect::TriggerWithoutOutgoing {
                node_id: "cmd_start".to_string(),
                type_name: "CommandTriggerNode".to_string()
            }]
        );
    }

    #[test]
    fn test_every_trigger_type_counts_as_entry_point() {
        for trigger in NodeType::triggers() {
            let mut builder = FlowBuilder::new();
            let data = match trigger {
                NodeType::CommandTrigger => json!({"command": "/start"}),
                NodeType::CronTrigger => json!({"schedule": "0 9 * * *"}),
                _ => json!({}),
            };
            let start = builder.add_node(trigger, data, Some("entry"));
            let hello = builder.add_node(NodeType::SendTextMessage, json!({"messageText": "Hi"}), None);
            builder.connect(&start, &hello, None);

            let defects = validate_document(&builder.build().to_value());
            assert!(defects.is_empty(), "{}: {:?}", trigger, defects);
        }
    }

    #[test]
    fn test_stranded_routes_are_grouped_conditionals_first() {
        let flow = json!({
            "nodes": [
                {"id": "cmd_start", "type": "CommandTriggerNode", "data": {"command": "/start"}, "position": {"x": 0, "y": 0}},
                {"id": "loop", "type": "ForLoopNode", "data": {"loopMode": "array"}, "position": {"x": 0, "y": 200}},
                {"id": "cmd_help", "type": "CommandTriggerNode", "data": {"command": "/help"}, "position": {"x": 300, "y": 0}},
                {"id": "coin", "type": "RandomNode", "data": {}, "position": {"x": 300, "y": 200}}
            ],
            "edges": []
        });

        let names: Vec<String> = validate_document(&flow)
            .into_iter()
            .map(|d| match d {
                Defect::ConditionalWithoutOutgoing { node_id, .. } => format!("cond:{}", node_id),
                Defect::TriggerWithoutOutgoing { node_id, .. } => format!("trigger:{}", node_id),
                other => panic!("unexpected defect: {}", other),
            })
            .collect();
        assert_eq!(
            names,
            vec!["cond:loop", "cond:coin", "trigger:cmd_start", "trigger:cmd_help"]
        );
    }
}

#[cfg(test)]
mod edge_tests {
    use super::*;

    #[test]
    fn test_dangling_source() {
        let mut flow = minimal_flow();
        if let Some(edges) = flow["edges"].as_array_mut() {
            edges.push(json!({"id": "e_ghost", "source": "ghost", "target": "send_welcome"}));
        }
        let defects = validate_document(&flow);
        assert_eq!(
            defects,
            vec![Defect::DanglingReference {
                edge: EdgeRef::Id("e_ghost".to_string()),
                endpoint: Endpoint::Source,
                node_id: "ghost".to_string()
            }]
        );
        assert_eq!(
            defects[0].to_string(),
            "Edge 'e_ghost': source 'ghost' does not exist"
        );
    }

    #[test]
    fn test_edges_without_id_are_named_by_position() {
        let mut flow = minimal_flow();
        if let Some(edges) = flow["edges"].as_array_mut() {
            edges.push(json!({"source": "cmd_start", "target": "ghost"}));
        }
        assert_eq!(
            validate_document(&flow),
            vec![Defect::DanglingReference {
                edge: EdgeRef::Index(1),
                endpoint: Endpoint::Target,
                node_id: "ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_edge_missing_endpoint() {
        let mut flow = minimal_flow();
        if let Some(edges) = flow["edges"].as_array_mut() {
            edges.push(json!({"id": "e_half", "source": "cmd_start"}));
        }
        assert_eq!(
            validate_document(&flow),
            vec![Defect::MissingEndpoint { index: 1 }]
        );
    }

    #[test]
    fn test_repeated_edge_id_is_reported_once() {
        let mut flow = minimal_flow();
        if let Some(edges) = flow["edges"].as_array_mut() {
            let copy = edges[0].clone();
            edges.push(copy.clone());
            edges.push(copy);
        }
        assert_eq!(
            validate_document(&flow),
            vec![Defect::DuplicateEdgeId {
                edge_id: "e1".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_source_handle() {
        let mut flow = order_bot_flow();
        flow["edges"][4]["sourceHandle"] = json!("maybe");

        let defects = validate_document(&flow);
        assert_eq!(defects.len(), 1);
        match &defects[0] {
            Defect::InvalidHandle {
                edge,
                handle,
                type_name,
                allowed,
            } => {
                assert_eq!(edge, &EdgeRef::Id("e_no".to_string()));
                assert_eq!(handle, "maybe");
                assert_eq!(type_name, "IfConditionNode");
                assert!(allowed.contains(&"false"));
            }
            other => panic!("unexpected defect: {}", other),
        }
        assert!(defects[0]
            .to_string()
            .ends_with("(valid: branch_0, branch_1, branch_2, branch_3, false, true)"));
    }

    #[test]
    fn test_handles_on_single_outcome_nodes_are_not_checked() {
        let mut flow = minimal_flow();
        flow["edges"][0]["sourceHandle"] = json!("anything");
        assert!(validate_document(&flow).is_empty());
    }

    #[test]
    fn test_every_vocabulary_handle_is_accepted() {
        for ty in NodeType::ALL.iter().filter(|t| t.is_conditional()) {
            let allowed = ty.handle_vocabulary().unwrap_or_default();
            let mut builder = FlowBuilder::new();
            let start = builder.add_node(NodeType::CommandTrigger, json!({"command": "/start"}), None);
            let required: serde_json::Map<_, _> = ty
                .required_fields()
                .iter()
                .map(|f| (f.to_string(), json!("x")))
                .collect();
            let branch = builder.add_node(*ty, serde_json::Value::Object(required), None);
            builder.connect(&start, &branch, None);
            for handle in allowed {
                let target = builder.add_node(NodeType::SendTextMessage, json!({"messageText": "Hi"}), None);
                builder.connect(&branch, &target, Some(*handle));
            }

            let defects = validate_document(&builder.build().to_value());
            assert!(defects.is_empty(), "{}: {:?}", ty, defects);
        }
    }
}
