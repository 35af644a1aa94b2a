//! Custom error types for Switchboard
//!
//! Provides a unified error handling system across all modules.
//! Most per-turn failures are recovered inside the router loop by turning
//! them into history entries; only contract violations reach the caller.

use thiserror::Error;

/// Main error type for Switchboard operations
#[derive(Error, Debug)]
pub enum SwitchboardError {
    /// Agent card resolution failed (connection refused, timeout, bad card)
    #[error("Agent endpoint unreachable at {url}: {reason}")]
    EndpointUnreachable { url: String, reason: String },

    /// A dispatched task did not complete within the transport timeout
    #[error("Dispatch to {url} timed out")]
    DispatchTimeout { url: String },

    /// The agent server could not be reached at all
    #[error("Dispatch to {url} failed: {reason}")]
    DispatchUnreachable { url: String, reason: String },

    /// The decision engine produced output that is not a valid decision
    #[error("Could not parse decision output: {raw}")]
    DecisionParse { raw: String },

    /// The decision engine call itself failed (API error, network)
    #[error("Decision engine error: {0}")]
    Engine(String),

    /// A decision named an agent absent from the configuration
    #[error("Unknown agent '{0}'")]
    UnknownTarget(String),

    /// The decision violated the engine contract (e.g. call_agent without
    /// an agent name). Not recoverable inside the loop.
    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for Switchboard operations
pub type Result<T> = std::result::Result<T, SwitchboardError>;

impl SwitchboardError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a decision engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Create an endpoint resolution error
    pub fn unreachable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EndpointUnreachable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether the router loop can absorb this failure as a history entry
    /// and keep going. Contract violations and cancellation cannot be.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EndpointUnreachable { .. }
                | Self::DispatchTimeout { .. }
                | Self::DispatchUnreachable { .. }
                | Self::DecisionParse { .. }
                | Self::Engine(_)
                | Self::UnknownTarget(_)
                | Self::Http(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(SwitchboardError::UnknownTarget("ghost".into()).is_recoverable());
        assert!(SwitchboardError::DispatchTimeout {
            url: "http://localhost:1".into()
        }
        .is_recoverable());
        assert!(!SwitchboardError::InvalidDecision("no agent".into()).is_recoverable());
        assert!(!SwitchboardError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_display_carries_context() {
        let err = SwitchboardError::unreachable("http://127.0.0.1:10020", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("http://127.0.0.1:10020"));
        assert!(msg.contains("connection refused"));
    }
}
