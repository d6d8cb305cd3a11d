//! # Botflow - Conversational Bot Flow Builder
//!
//! **Botflow** turns a conversation about a Telegram bot into a *flow*: a
//! directed graph of trigger, message, control-flow and data nodes, joined by
//! edges, ready for the Botmother engine. A language model writes the flow;
//! Botflow decides when to ask it to, checks the result, and feeds structural
//! defects back for repair until the flow is sound or the retry budget runs out.
//!
//! ## Core Workflow
//!
//! 1.  **Provide a completion service**: implement [`CompletionService`](completion::CompletionService)
//!     for your model client (or enable the `openai` feature and use `OpenAiCompletion`).
//! 2.  **Create an orchestrator**: [`Orchestrator::new`](agent::Orchestrator::new) with the service,
//!     optionally tuned through [`AgentConfig`](agent::AgentConfig).
//! 3.  **Converse**: pass each user message with the current [`Session`](agent::Session) to
//!     `handle_message`. The returned [`Turn`](agent::Turn) carries the updated session, the
//!     reply to show (never raw JSON) and the validator's verdict on the held flow.
//! 4.  **Validate anywhere**: [`validate_flow`](validator::validate_flow) is a pure function
//!     usable on its own, e.g. for flows edited by hand.
//!
//! ## Quick Start
//!
//! ```rust
//! use botflow::prelude::*;
//!
//! let flow = r#"{"nodes": [
//!     {"id": "cmd_start", "type": "CommandTriggerNode", "data": {"command": "/start"}, "position": {"x": 0, "y": 0}},
//!     {"id": "send_welcome", "type": "SendTextMessageNode", "data": {"messageText": "Hi!"}, "position": {"x": 0, "y": 200}}
//!  ],
//!  "edges": [{"id": "e1", "source": "cmd_start", "target": "send_welcome"}]}"#;
//! let fence = "`".repeat(3);
//!
//! // A scripted service stands in for a real model here.
//! let service = ScriptedCompletion::new([
//!     "Great, I'll create that bot for you!".to_string(),
//!     format!("Here is your flow:\n{fence}json\n{flow}\n{fence}"),
//! ]);
//! let orchestrator = Orchestrator::new(service);
//!
//! let mut session = Session::new();
//! let turn = orchestrator.respond(&mut session, "I need a welcome bot")?;
//!
//! assert_eq!(turn.phase(), Phase::Done);
//! assert!(turn.is_valid_flow());
//! assert_eq!(turn.reply.as_deref(), Some("Here is your flow:"));
//! # Ok::<(), botflow::error::AgentError>(())
//! ```

pub mod agent;
pub mod completion;
pub mod error;
pub mod flow;
pub mod prelude;
pub mod validator;
