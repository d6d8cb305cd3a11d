//! Pulling candidate flow documents out of free-form model output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Shown to the user when a reply is nothing but structured output.
pub const CANNED_ACKNOWLEDGMENT: &str =
    "Your bot flow is ready. Let me know if you would like to change anything.";

static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("static regex is valid")
});

static UNTERMINATED_JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json[\s\S]*$").expect("static regex is valid"));

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("static regex is valid"));

/// Returns the first fenced `json` block that parses as an object with both
/// `nodes` and `edges` members. Malformed blocks are skipped.
pub fn extract_flow(text: &str) -> Option<Value> {
    JSON_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| {
            let parsed: Value = match serde_json::from_str(body.as_str()) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!("Skipping unparseable json block: {}", e);
                    return None;
                }
            };
            if has_flow_shape(&parsed) {
                Some(parsed)
            } else {
                log::debug!("Skipping json block without 'nodes' and 'edges'");
                None
            }
        })
}

/// Like [`extract_flow`], re-serialized with stable (sorted) key order.
pub fn extract_flow_json(text: &str) -> Option<String> {
    extract_flow(text).and_then(|flow| serde_json::to_string_pretty(&flow).ok())
}

fn has_flow_shape(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("nodes") && obj.contains_key("edges"))
}

/// Removes every fenced `json` block (including one cut off mid-stream) and
/// tidies the whitespace left behind.
pub fn strip_flow_blocks(text: &str) -> String {
    let without_blocks = JSON_BLOCK.replace_all(text, "");
    let without_tail = UNTERMINATED_JSON_BLOCK.replace(&without_blocks, "");
    BLANK_RUNS
        .replace_all(&without_tail, "\n\n")
        .trim()
        .to_string()
}

/// The text a user should see for a model reply: commentary only, never raw JSON.
pub fn visible_reply(text: &str) -> String {
    let cleaned = strip_flow_blocks(text);
    if cleaned.chars().any(char::is_alphanumeric) {
        cleaned
    } else {
        CANNED_ACKNOWLEDGMENT.to_string()
    }
}
