//! Decision module - the router's reasoning step
//!
//! The engine behind [`DecisionEngine`] is a black box to the rest of the
//! crate: anything that maps a history to a structured decision can drive
//! the router, which is what makes the loop testable without a model.

pub mod gemini;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::core::{AgentEndpoint, Decision, Result, SwitchboardError};
use crate::router::History;

pub use gemini::GeminiEngine;

/// Name recorded in history entries for failures of the decision step
/// itself (parse errors, engine API errors)
pub const DECISION_SOURCE: &str = "decision_engine";

/// Produces the next decision from the accumulated history
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Inspect the history and decide: call an agent, or finish
    async fn decide(&self, history: &History) -> Result<Decision>;
}

/// Parse raw engine output into a [`Decision`].
///
/// Models habitually wrap JSON in markdown fences; strip those before
/// parsing. Failures carry the raw output so the loop can record it.
pub fn parse_decision(raw: &str) -> Result<Decision> {
    let clean = raw.replace("```json", "").replace("```", "");
    let clean = clean.trim();

    serde_json::from_str(clean).map_err(|_| SwitchboardError::DecisionParse {
        raw: raw.to_string(),
    })
}

/// Render the router instructions from the configured agent roster.
///
/// The response-format contract must stay in lockstep with
/// [`parse_decision`] and the [`Decision`] wire shape.
pub fn build_system_prompt(agents: &BTreeMap<String, AgentEndpoint>) -> String {
    let mut roster = String::new();
    for (i, (name, endpoint)) in agents.iter().enumerate() {
        roster.push_str(&format!(
            "{}. \"{}\"\n   - Capabilities: {}\n\n",
            i + 1,
            name,
            endpoint.description
        ));
    }

    format!(
        r#"You are the Router Agent (Orchestrator) for a customer service system.
You have these specialized sub-agents you can call via A2A tools:

{roster}Your Goal: Answer the user's request by coordinating these agents.

CRITICAL INSTRUCTION FOR LISTS:
- If the user asks for a list of records with specific conditions, do NOT check them one by one.
- BATCH YOUR REQUESTS: retrieve the candidate list first, then send a SINGLE message requesting details for ALL the retrieved IDs at once, and filter the results yourself.

RESPONSE FORMAT:
You must strictly return a JSON object in this format (no markdown formatting):
{{
    "thought": "Explanation of your reasoning",
    "action": "call_agent" OR "final_answer",
    "agent_name": "<one of the agent names above>" (only if action is call_agent),
    "content": "The specific query string to send to that agent" OR "The final text response to the user"
}}"#
    )
}
