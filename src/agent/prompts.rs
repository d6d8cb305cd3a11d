//! Prompt templates for each phase of the agent.

use super::phase::Phase;
use crate::flow::{NodeCategory, NodeType};
use crate::validator::{Defect, format_defects};
use itertools::Itertools;
use once_cell::sync::Lazy;

const ROLE_AND_RULES: &str = "\
You are the Botmother Flow Builder, an assistant that designs Telegram bot flows \
for the Botmother engine. Reply in the user's language (Uzbek, Russian or English).

## How to work
- Keep replies short and friendly.
- When the user describes a bot, build the flow right away using sensible defaults.
- Always include a /start CommandTriggerNode.
- Prefer inline keyboards for choices, HTML parse mode, and a typing ChatActionNode before messages.
- Ask at most one question at a time, and only when the request is truly ambiguous.
- Summarize what the bot will do as a bulleted list (\"- ...\").

## Flow JSON format
A flow is a JSON object with exactly two members:
```
{
  \"nodes\": [{\"id\": \"unique_id\", \"type\": \"NodeType\", \"data\": {...}, \"position\": {\"x\": 0, \"y\": 0}}],
  \"edges\": [{\"id\": \"edge_id\", \"source\": \"node_id_1\", \"target\": \"node_id_2\", \"sourceHandle\": \"optional\"}]
}
```
";

const STRUCTURAL_RULES: &str = "\
## Structural rules
1. Every flow starts with at least one trigger node, and every trigger has an outgoing edge.
2. Triggers are entry points; they are matched, never executed as actions.
3. Node ids and edge ids are unique. Every edge source and target is an existing node id.
4. Every node has a `position`. Lay nodes out in a readable grid (x = column, y = row).
5. Branching nodes need at least one outgoing edge, each using one of their sourceHandles.
6. Inline keyboard buttons are handled by CallbackButtonTriggerNode or CallbackQueryTriggerNode; \
reply keyboard buttons by ReplyButtonTriggerNode.
7. Use `{{state_name}}` style template variables to reference saved state.

## Output
When you produce a flow, put the complete JSON inside a single ```json code block. \
Use descriptive ids such as \"cmd_start\" or \"send_welcome\".
";

static SYSTEM_PROMPT: Lazy<String> = Lazy::new(|| {
    format!(
        "{}\n{}\n{}",
        ROLE_AND_RULES,
        node_catalogue_section(),
        STRUCTURAL_RULES
    )
});

fn category_title(category: NodeCategory) -> &'static str {
    match category {
        NodeCategory::Trigger => "Triggers (entry points)",
        NodeCategory::Message => "Messages",
        NodeCategory::MessageOperation => "Message operations",
        NodeCategory::Interactive => "Interactive",
        NodeCategory::FlowControl => "Flow control",
        NodeCategory::Data => "Data and state",
        NodeCategory::Integration => "Integrations",
    }
}

/// Lists every supported type with its required `data` keys and sourceHandles.
fn node_catalogue_section() -> String {
    let mut section = String::from("## Supported node types\n");
    let groups = NodeType::ALL.iter().chunk_by(|ty| ty.category());
    for (category, types) in &groups {
        section.push_str(&format!("\n### {}\n", category_title(category)));
        for ty in types {
            let mut line = format!("- {}", ty);
            let required = ty.required_fields();
            if !required.is_empty() {
                line.push_str(&format!(" (data requires: {})", required.join(", ")));
            }
            if let Some(handles) = ty.handle_vocabulary() {
                line.push_str(&format!(" [sourceHandle: {}]", handles.join(" | ")));
            }
            section.push_str(&line);
            section.push('\n');
        }
    }
    section
}

pub fn system_prompt() -> &'static str {
    &SYSTEM_PROMPT
}

fn bullet_list(requirements: &[String]) -> Option<String> {
    if requirements.is_empty() {
        None
    } else {
        Some(requirements.iter().map(|r| format!("- {}", r)).join("\n"))
    }
}

/// The instruction block appended to the system prompt for a phase.
pub fn phase_instructions(phase: Phase, requirements: &[String]) -> String {
    match phase.conversational() {
        Phase::Chat => "## Current phase: CHAT\n\
            Have a natural conversation. As soon as the user describes a bot, say you will create it. \
            If you already know enough, include the complete flow JSON directly."
            .to_string(),
        Phase::Gathering => format!(
            "## Current phase: GATHERING REQUIREMENTS\n\
             Requirements collected so far:\n{}\n\n\
             Ask one clarifying question about commands, buttons, data to collect, conditions or storage. \
             When you have enough, generate the flow JSON.",
            bullet_list(requirements).unwrap_or_else(|| "None yet".to_string())
        ),
        Phase::Generating => "## Current phase: GENERATING\nGenerate the flow JSON now.".to_string(),
        Phase::Validating => "## Current phase: REPAIRING\n\
            The last flow failed structural validation. Return the complete corrected flow, never a partial diff."
            .to_string(),
        Phase::Done => String::new(),
    }
}

/// The system message for a phase: shared rules plus phase instructions.
pub fn system_message(phase: Phase, requirements: &[String]) -> String {
    format!(
        "{}\n\n{}",
        system_prompt(),
        phase_instructions(phase, requirements)
    )
}

/// Asks for the flow outright, based on the conversation so far.
pub fn generation_request(requirements: &[String]) -> String {
    format!(
        "Based on the conversation so far, generate a complete Botmother engine flow JSON.\n\n\
         Requirements gathered:\n{}\n\n\
         Include:\n\
         1. All necessary trigger nodes\n\
         2. All action and message nodes\n\
         3. Edges with the correct sourceHandles\n\
         4. Keyboards where needed\n\
         5. State management for user input\n\
         6. Conditions and branching if needed\n\
         7. Collection operations if data must be stored\n\n\
         Output ONLY the JSON inside ```json ... ``` markers.",
        bullet_list(requirements).unwrap_or_else(|| "See conversation above.".to_string())
    )
}

/// Quotes every defect and the full current document, asking for a full replacement.
pub fn repair_request(defects: &[Defect], flow_json: &str) -> String {
    format!(
        "The flow you generated has structural errors:\n{}\n\n\
         Current flow:\n```json\n{}\n```\n\n\
         Fix every error above and return the COMPLETE corrected flow (all nodes and all edges, \
         not just the changes) inside a single ```json code block.",
        format_defects(defects),
        flow_json
    )
}

/// First message of a one-shot generation.
pub fn one_shot_request(description: &str) -> String {
    format!(
        "Create a Telegram bot with these requirements:\n{}\n\nGenerate the complete flow JSON now.",
        description.trim()
    )
}
