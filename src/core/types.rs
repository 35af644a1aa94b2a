//! Shared types used across Switchboard modules
//!
//! Contains the decision schema, conversation history entries, and the
//! reply type handed back to callers.

use serde::{Deserialize, Serialize};

/// What the decision engine wants the router to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    /// Delegate a sub-task to a specialist agent
    CallAgent,
    /// Stop and return the content as the final answer
    FinalAnswer,
}

/// One structured output from the decision engine.
///
/// The `thought` field is advisory only and never drives control flow;
/// routing is decided solely by `action`, `agent_name` and `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Free-text rationale from the engine
    #[serde(default)]
    pub thought: String,
    /// Whether to call an agent or finish
    pub action: DecisionAction,
    /// Target agent name, required when action is `call_agent`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    /// Query to send to the agent, or the final answer text
    pub content: String,
}

impl Decision {
    /// Create a call_agent decision
    pub fn call_agent(
        thought: impl Into<String>,
        agent_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            thought: thought.into(),
            action: DecisionAction::CallAgent,
            agent_name: Some(agent_name.into()),
            content: content.into(),
        }
    }

    /// Create a final_answer decision
    pub fn final_answer(thought: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            thought: thought.into(),
            action: DecisionAction::FinalAnswer,
            agent_name: None,
            content: content.into(),
        }
    }
}

/// One entry in a request's conversation history.
///
/// Entries are only ever appended, never mutated or removed; the router
/// loop's behavior is a function of this sequence plus the turn counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// The original user query, always the first entry
    UserQuery { text: String },
    /// A decision produced by the engine
    Decision(Decision),
    /// Text returned by an agent for a prior dispatch, or an error marker
    /// when the dispatch (or the decision itself) failed
    AgentResult {
        agent: String,
        text: String,
        is_error: bool,
    },
}

impl HistoryEntry {
    /// Create a successful agent result entry
    pub fn agent_result(agent: impl Into<String>, text: impl Into<String>) -> Self {
        Self::AgentResult {
            agent: agent.into(),
            text: text.into(),
            is_error: false,
        }
    }

    /// Create an error agent result entry
    pub fn agent_error(agent: impl Into<String>, text: impl Into<String>) -> Self {
        Self::AgentResult {
            agent: agent.into(),
            text: text.into(),
            is_error: true,
        }
    }
}

/// Terminal outcome of one routed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The engine produced a final answer
    Done,
    /// The turn bound was reached without a final answer
    Exhausted,
    /// The caller cancelled the request
    Cancelled,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Done => write!(f, "done"),
            Outcome::Exhausted => write!(f, "exhausted"),
            Outcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// What the router hands back to the caller.
///
/// The history is included so callers can log or inspect the exchange;
/// the router itself never reads it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterReply {
    /// Final answer text (or the best-available partial answer)
    pub answer: String,
    /// How the request terminated
    pub outcome: Outcome,
    /// Full exchange record for this request
    pub history: Vec<HistoryEntry>,
}
