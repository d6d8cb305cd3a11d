//! Common test utilities: canonical flows, broken variants and scripted model replies.
#![allow(dead_code)]

use botflow::prelude::*;
use serde_json::{Value, json};

/// A small but complete order bot: /start greets with a keyboard, the
/// "order" button asks for a product and confirms it.
pub fn order_bot_flow() -> Value {
    json!({
        "nodes": [
            {
                "id": "cmd_start",
                "type": "CommandTriggerNode",
                "data": {"command": "/start"},
                "position": {"x": 0, "y": 0}
            },
            {
                "id": "send_welcome",
                "type": "SendTextMessageNode",
                "data": {
                    "messageText": "Welcome! Tap the button to place an order.",
                    "parseMode": "HTML",
                    "keyboard": {"type": "inline", "buttons": [[{"text": "Order", "callbackData": "order"}]]}
                },
                "position": {"x": 0, "y": 200}
            },
            {
                "id": "cb_order",
                "type": "CallbackButtonTriggerNode",
                "data": {"callbackData": "order"},
                "position": {"x": 300, "y": 0}
            },
            {
                "id": "ask_product",
                "type": "SendTextMessageNode",
                "data": {"messageText": "Which product would you like?"},
                "position": {"x": 300, "y": 200}
            },
            {
                "id": "check_stock",
                "type": "IfConditionNode",
                "data": {"conditions": [{"variable": "{{stock}}", "operator": ">", "value": "0"}]},
                "position": {"x": 300, "y": 400}
            },
            {
                "id": "send_confirmed",
                "type": "SendTextMessageNode",
                "data": {"messageText": "Your order is confirmed."},
                "position": {"x": 200, "y": 600}
            },
            {
                "id": "send_sold_out",
                "type": "SendTextMessageNode",
                "data": {"messageText": "Sorry, that product is sold out."},
                "position": {"x": 400, "y": 600}
            }
        ],
        "edges": [
            {"id": "e_start", "source": "cmd_start", "target": "send_welcome"},
            {"id": "e_order", "source": "cb_order", "target": "ask_product"},
            {"id": "e_check", "source": "ask_product", "target": "check_stock"},
            {"id": "e_yes", "source": "check_stock", "target": "send_confirmed", "sourceHandle": "true"},
            {"id": "e_no", "source": "check_stock", "target": "send_sold_out", "sourceHandle": "false"}
        ]
    })
}

/// Two nodes and one edge: the smallest flow the validator accepts.
pub fn minimal_flow() -> Value {
    json!({
        "nodes": [
            {"id": "cmd_start", "type": "CommandTriggerNode", "data": {"command": "/start"}, "position": {"x": 0, "y": 0}},
            {"id": "send_welcome", "type": "SendTextMessageNode", "data": {"messageText": "Hello!"}, "position": {"x": 0, "y": 200}}
        ],
        "edges": [
            {"id": "e1", "source": "cmd_start", "target": "send_welcome"}
        ]
    })
}

/// [`minimal_flow`] with the send node's `position` removed.
pub fn flow_missing_position() -> Value {
    let mut flow = minimal_flow();
    if let Some(node) = flow["nodes"][1].as_object_mut() {
        node.remove("position");
    }
    flow
}

/// Wraps a document in a fenced json block, the way a model returns it.
pub fn fenced(flow: &Value) -> String {
    format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(flow).expect("fixture serializes")
    )
}

/// A model reply carrying commentary followed by a flow.
pub fn reply_with_flow(commentary: &str, flow: &Value) -> String {
    format!("{}\n\n{}", commentary, fenced(flow))
}

/// The conversational reply that moves a session from chat into generation.
pub const BOT_INTENT_REPLY: &str = "Great, I'll create that bot for you!";

/// A reply with no bot-intent keyword and no flow: the session stays in chat.
pub const SMALL_TALK_REPLY: &str = "Hello! Nice to meet you.";

pub fn scripted<I, S>(responses: I) -> ScriptedCompletion
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ScriptedCompletion::new(responses)
}
