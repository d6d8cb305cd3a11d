//! The conversation / generation / validation loop.
//!
//! An [`Orchestrator`] owns a completion service and a configuration; all
//! per-conversation state lives in the [`Session`] value passed to it. Each
//! call works on a copy of the session and only returns the updated copy on
//! success, so a failed completion call leaves the caller's session exactly as
//! it was and the turn can simply be retried.

use crate::completion::{ChatMessage, CompletionService};
use crate::error::AgentError;
use crate::flow::{CANNED_ACKNOWLEDGMENT, extract_flow, strip_flow_blocks};
use crate::validator::{Defect, validate_document};

mod config;
mod phase;
pub mod prompts;
mod requirements;
mod session;

pub use config::{AgentConfig, GenerationMode};
pub use phase::{Outcome, Phase, asks_question, signals_bot_intent};
pub use requirements::extract_requirements;
pub use session::Session;

/// The result of one orchestrator call.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// The updated session. Store it in place of the one passed in.
    pub session: Session,
    /// Commentary to show the user, with any flow JSON stripped out. `None`
    /// when no completion was requested.
    pub reply: Option<String>,
    /// Validator output for the flow the session ends up holding.
    pub defects: Vec<Defect>,
    pub completion_calls: usize,
}

impl Turn {
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// True when the session holds a flow with no structural defects.
    pub fn is_valid_flow(&self) -> bool {
        self.session.has_flow() && self.defects.is_empty()
    }
}

/// Drives sessions through the phase state machine.
pub struct Orchestrator<C> {
    service: C,
    config: AgentConfig,
}

/// Scratch state for a single call.
struct TurnState {
    session: Session,
    /// A user message that still needs a conversational reply.
    pending_message: bool,
    replies: Vec<String>,
}

impl<C: CompletionService> Orchestrator<C> {
    pub fn new(service: C) -> Self {
        Self::with_config(service, AgentConfig::default())
    }

    pub fn with_config(service: C, config: AgentConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn service(&self) -> &C {
        &self.service
    }

    /// Processes one user message and returns the updated session.
    pub fn handle_message(&self, session: &Session, message: &str) -> Result<Turn, AgentError> {
        let mut working = session.clone();
        working.push_user(message);
        working.turn_count += 1;
        self.drive(working, true)
    }

    /// Like [`handle_message`](Self::handle_message), committing the result into `session`.
    pub fn respond(&self, session: &mut Session, message: &str) -> Result<Turn, AgentError> {
        let turn = self.handle_message(session, message)?;
        *session = turn.session.clone();
        Ok(turn)
    }

    /// Continues a session without a new user message.
    ///
    /// Sessions resting in `chat` or `done` (or `gathering` in clarifying mode)
    /// are returned unchanged without calling the completion service. A session stored mid-generation
    /// or mid-validation is carried through to the end of the loop.
    pub fn resume(&self, session: &Session) -> Result<Turn, AgentError> {
        self.drive(session.clone(), false)
    }

    /// Generates a flow from a description in a fresh session, skipping conversation.
    pub fn generate_once(&self, description: &str) -> Result<Turn, AgentError> {
        let mut session = Session::new();
        session.push_user(prompts::one_shot_request(description));
        session.turn_count = 1;
        session.phase = Phase::Generating;
        self.drive(session, false)
    }

    fn drive(&self, session: Session, pending_message: bool) -> Result<Turn, AgentError> {
        let mut state = TurnState {
            session,
            pending_message,
            replies: Vec::new(),
        };

        loop {
            let phase = state.session.phase;
            match phase {
                Phase::Gathering if self.config.mode == GenerationMode::Immediate => {
                    self.enter(&mut state.session, Phase::Generating);
                }
                Phase::Chat | Phase::Gathering | Phase::Done => {
                    if !state.pending_message {
                        break;
                    }
                    state.pending_message = false;
                    self.converse(&mut state)?;
                }
                Phase::Generating => self.generate(&mut state)?,
                Phase::Validating => self.validate_or_repair(&mut state)?,
            }
        }

        let defects = state
            .session
            .flow
            .as_ref()
            .map(validate_document)
            .unwrap_or_default();
        let completion_calls = state.replies.len();
        Ok(Turn {
            reply: visible_turn_reply(&state.replies),
            session: state.session,
            defects,
            completion_calls,
        })
    }

    fn converse(&self, state: &mut TurnState) -> Result<(), AgentError> {
        let phase = state.session.phase.conversational();
        let mut prompt = vec![ChatMessage::system(prompts::system_message(
            phase,
            &state.session.requirements,
        ))];
        prompt.extend(state.session.messages.iter().cloned());

        let reply = self.complete(state, phase, &prompt)?;
        let candidate = extract_flow(&reply);
        let outcome = Outcome::Reply {
            has_flow: candidate.is_some(),
            bot_intent: signals_bot_intent(&reply),
            asks_question: asks_question(&reply),
            turn_limit_reached: state.session.turn_count > self.config.gathering_turn_limit,
        };
        if let Some(flow) = candidate {
            log::info!("Conversational reply already contains a flow");
            state.session.flow = Some(flow);
        }

        let next = phase.transition(outcome, self.config.mode);
        self.enter(&mut state.session, next);
        Ok(())
    }

    fn generate(&self, state: &mut TurnState) -> Result<(), AgentError> {
        let mut prompt = vec![ChatMessage::system(prompts::system_message(
            Phase::Generating,
            &state.session.requirements,
        ))];
        prompt.extend(state.session.messages.iter().cloned());
        prompt.push(ChatMessage::user(prompts::generation_request(
            &state.session.requirements,
        )));

        let reply = self.complete(state, Phase::Generating, &prompt)?;
        let candidate = extract_flow(&reply);
        let outcome = Outcome::Generation {
            has_flow: candidate.is_some(),
        };
        match candidate {
            Some(flow) => state.session.flow = Some(flow),
            None => log::info!("Generation produced no flow; falling back to conversation"),
        }

        let next = Phase::Generating.transition(outcome, self.config.mode);
        self.enter(&mut state.session, next);
        Ok(())
    }

    fn validate_or_repair(&self, state: &mut TurnState) -> Result<(), AgentError> {
        let Some(flow) = state.session.flow.as_ref() else {
            log::warn!("Nothing to validate; closing the turn without a flow");
            self.enter(&mut state.session, Phase::Done);
            return Ok(());
        };

        let defects = validate_document(flow);
        let budget_left = state.session.validation_retries < self.config.max_validation_retries;
        let outcome = Outcome::Validation {
            clean: defects.is_empty(),
            budget_left,
        };
        let next = Phase::Validating.transition(outcome, self.config.mode);
        if next != Phase::Validating {
            if !defects.is_empty() {
                log::warn!(
                    "Accepting flow with {} defects after {} repair attempts",
                    defects.len(),
                    state.session.validation_retries
                );
            }
            self.enter(&mut state.session, next);
            return Ok(());
        }

        state.session.validation_retries += 1;
        log::info!(
            "Repair attempt {}/{} for {} defects",
            state.session.validation_retries,
            self.config.max_validation_retries,
            defects.len()
        );
        let flow_json = serde_json::to_string_pretty(flow).unwrap_or_else(|_| flow.to_string());

        let mut prompt = vec![ChatMessage::system(prompts::system_message(
            Phase::Validating,
            &state.session.requirements,
        ))];
        prompt.extend(state.session.messages.iter().cloned());
        prompt.push(ChatMessage::user(prompts::repair_request(&defects, &flow_json)));

        let reply = self.complete(state, Phase::Validating, &prompt)?;
        let candidate = extract_flow(&reply);
        let outcome = Outcome::Repair {
            has_flow: candidate.is_some(),
        };
        match candidate {
            Some(replacement) => state.session.flow = Some(replacement),
            None => log::warn!("Repair attempt returned no flow; keeping the previous candidate"),
        }

        let next = Phase::Validating.transition(outcome, self.config.mode);
        self.enter(&mut state.session, next);
        Ok(())
    }

    /// One completion call. The reply is recorded in the session and scanned for requirements.
    fn complete(
        &self,
        state: &mut TurnState,
        phase: Phase,
        prompt: &[ChatMessage],
    ) -> Result<String, AgentError> {
        log::debug!("Requesting completion in phase '{}'", phase);
        let reply = self
            .service
            .complete(prompt)
            .map_err(|source| AgentError::Completion { phase, source })?;

        let added = extract_requirements(
            &reply,
            &mut state.session.requirements,
            self.config.requirement_max_len,
        );
        if added > 0 {
            log::debug!("Recorded {} new requirements", added);
        }
        state.session.push_assistant(reply.clone());
        state.replies.push(reply.clone());
        Ok(reply)
    }

    fn enter(&self, session: &mut Session, next: Phase) {
        if session.phase != next {
            log::debug!("Phase {} -> {}", session.phase, next);
        }
        session.phase = next;
    }
}

/// The latest reply of the turn that still has commentary once flow JSON is
/// removed, or the canned acknowledgment if there is none.
fn visible_turn_reply(replies: &[String]) -> Option<String> {
    if replies.is_empty() {
        return None;
    }
    let commentary = replies
        .iter()
        .rev()
        .map(|r| strip_flow_blocks(r))
        .find(|text| text.chars().any(char::is_alphanumeric));
    Some(commentary.unwrap_or_else(|| CANNED_ACKNOWLEDGMENT.to_string()))
}
