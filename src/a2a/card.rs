//! Agent card data model
//!
//! Agent servers describe themselves with a card document served at a
//! well-known path. Fields are camelCase on the wire and all defaulted so
//! a sparse card from a minimal server still resolves.

use serde::{Deserialize, Serialize};

/// Well-known relative path where A2A servers publish their card
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent.json";

/// Metadata describing a remote agent: address, capabilities, skills
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentCard {
    /// Human-readable agent name
    pub name: String,
    /// What the agent does
    pub description: String,
    /// Base URL the agent serves A2A requests on
    pub url: String,
    /// Card schema/agent version
    pub version: String,
    /// Optional transport capabilities
    pub capabilities: AgentCapabilities,
    /// MIME types the agent accepts
    pub default_input_modes: Vec<String>,
    /// MIME types the agent produces
    pub default_output_modes: Vec<String>,
    /// Transport the agent prefers (e.g. "JSONRPC")
    pub preferred_transport: Option<String>,
    /// Declared skills
    pub skills: Vec<AgentSkill>,
}

/// Transport-level capabilities declared by an agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentCapabilities {
    /// Whether the agent supports streaming responses (message/stream)
    pub streaming: bool,
    /// Whether the agent supports push notifications
    pub push_notifications: bool,
}

/// One skill advertised on an agent card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSkill {
    /// Stable skill identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// What the skill does
    pub description: String,
    /// Search tags
    pub tags: Vec<String>,
    /// Example invocations
    pub examples: Vec<String>,
}
