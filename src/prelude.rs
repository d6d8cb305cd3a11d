//! Prelude module for convenient imports
//!
//! Re-exports the types needed to run a conversation and validate flows.
//!
//! # Example
//!
//! ```rust,no_run
//! use botflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow_json = std::fs::read_to_string("path/to/flow.json")?;
//! for defect in validate_flow(&flow_json) {
//!     println!("{}", defect);
//! }
//! # Ok(())
//! # }
//! ```

// Conversation loop
pub use crate::agent::{AgentConfig, GenerationMode, Orchestrator, Phase, Session, Turn};

// Completion backends
pub use crate::completion::{ChatMessage, CompletionService, Role, ScriptedCompletion};

// Flow model
pub use crate::flow::{
    FlowBuilder, FlowDocument, FlowEdge, FlowNode, NodeData, NodeType, Position, extract_flow,
};

// Validation
pub use crate::validator::{Defect, format_defects, validate_document, validate_flow};

// Error types
pub use crate::error::{AgentError, CompletionError, ConfigError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
