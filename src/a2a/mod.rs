//! A2A module - agent-to-agent transport
//!
//! Card resolution, per-process card caching, and the task client that
//! carries one dispatch to a remote agent.

pub mod card;
pub mod client;
pub mod directory;

pub use card::{AgentCapabilities, AgentCard, AgentSkill, AGENT_CARD_WELL_KNOWN_PATH};
pub use client::{A2aClient, TaskClient};
pub use directory::EndpointDirectory;
