use super::config::GenerationMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Words in a reply that signal the conversation is about building a bot.
const BOT_INTENT_KEYWORDS: &[&str] = &[
    "bot", "бот", "flow", "флоу", "yaratish", "создать", "create",
];

/// Markers of a clarifying question (Uzbek, Russian, English).
const QUESTION_MARKERS: &[&str] = &[
    "?", "qanday", "какой", "nechta", "сколько", "what", "which", "how many",
];

/// Where a session is in the conversation / generation / validation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Chat,
    Gathering,
    Generating,
    Validating,
    Done,
}

/// What happened in the step that just ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A conversational reply came back.
    Reply {
        has_flow: bool,
        bot_intent: bool,
        asks_question: bool,
        /// Only consulted while gathering.
        turn_limit_reached: bool,
    },
    /// A direct generation attempt finished.
    Generation { has_flow: bool },
    /// The validator ran on the held candidate.
    Validation { clean: bool, budget_left: bool },
    /// A repair attempt finished. The candidate is re-validated either way.
    Repair { has_flow: bool },
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Chat => "chat",
            Phase::Gathering => "gathering",
            Phase::Generating => "generating",
            Phase::Validating => "validating",
            Phase::Done => "done",
        }
    }

    /// Phases in which the next step is a conversational reply to the user.
    pub fn is_conversational(self) -> bool {
        matches!(self, Phase::Chat | Phase::Gathering | Phase::Done)
    }

    /// The phase whose instructions drive a conversational reply. `Done`
    /// converses exactly like `Chat`.
    pub fn conversational(self) -> Phase {
        match self {
            Phase::Done => Phase::Chat,
            other => other,
        }
    }

    /// The state machine. Outcomes that cannot occur in a phase leave it unchanged.
    pub fn transition(self, outcome: Outcome, mode: GenerationMode) -> Phase {
        match (self.conversational(), outcome) {
            (Phase::Chat, Outcome::Reply { has_flow: true, .. }) => Phase::Done,
            (Phase::Chat, Outcome::Reply {
                bot_intent,
                asks_question,
                ..
            }) => match mode {
                GenerationMode::Immediate if bot_intent => Phase::Generating,
                GenerationMode::Clarifying if bot_intent && asks_question => Phase::Gathering,
                _ => Phase::Chat,
            },

            (Phase::Gathering, Outcome::Reply { has_flow: true, .. }) => Phase::Done,
            (Phase::Gathering, Outcome::Reply {
                turn_limit_reached, ..
            }) => match mode {
                GenerationMode::Immediate => Phase::Generating,
                GenerationMode::Clarifying if turn_limit_reached => Phase::Generating,
                GenerationMode::Clarifying => Phase::Gathering,
            },

            (Phase::Generating, Outcome::Generation { has_flow: true }) => Phase::Validating,
            (Phase::Generating, Outcome::Generation { has_flow: false }) => Phase::Chat,

            (Phase::Validating, Outcome::Validation { clean: true, .. }) => Phase::Done,
            (Phase::Validating, Outcome::Validation {
                budget_left: true, ..
            }) => Phase::Validating,
            (Phase::Validating, Outcome::Validation {
                budget_left: false, ..
            }) => Phase::Done,
            (Phase::Validating, Outcome::Repair { .. }) => Phase::Validating,

            _ => self,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn signals_bot_intent(text: &str) -> bool {
    let lower = text.to_lowercase();
    BOT_INTENT_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn asks_question(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUESTION_MARKERS.iter().any(|q| lower.contains(q))
}
