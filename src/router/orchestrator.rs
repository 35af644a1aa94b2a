//! Router orchestrator
//!
//! The state machine driving one request: ask the decision engine what to
//! do, dispatch to a specialist agent when directed, feed the result back
//! into the history, and converge on a final answer within the turn
//! bound. Execution is strictly sequential: one decision, at most one
//! dispatch, then the next turn.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::a2a::{A2aClient, TaskClient};
use crate::core::{
    Config, DecisionAction, Outcome, Result, RouterReply, SwitchboardError,
};
use crate::decision::{DecisionEngine, GeminiEngine, DECISION_SOURCE};
use crate::router::History;

/// Answer returned when the turn bound is hit before any dispatch fired
const EXHAUSTED_FALLBACK: &str = "The request could not be completed within the allotted turns.";

/// Answer returned when the caller cancels mid-request
const CANCELLED_ANSWER: &str = "Request cancelled before completion.";

/// Maximum characters of an agent reply echoed into the logs
const RESPONSE_PREVIEW_CHARS: usize = 200;

/// Orchestrates one query end-to-end across the specialist agents
pub struct Router {
    config: Config,
    engine: Arc<dyn DecisionEngine>,
    client: Arc<dyn TaskClient>,
}

impl Router {
    /// Create a router with the Gemini engine and HTTP A2A client
    pub fn new(config: Config) -> Self {
        let engine = Arc::new(GeminiEngine::from_config(&config));
        let client = Arc::new(A2aClient::from_config(&config.transport));
        Self::with_parts(config, engine, client)
    }

    /// Create a router from explicit parts. This is the seam used to
    /// substitute scripted engines and stub transports in tests.
    pub fn with_parts(
        config: Config,
        engine: Arc<dyn DecisionEngine>,
        client: Arc<dyn TaskClient>,
    ) -> Self {
        Self {
            config,
            engine,
            client,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process one user query to a terminal outcome.
    ///
    /// Always returns a reply for operational failures (timeouts, bad
    /// responses, unknown agents); those are recorded in the history for
    /// the engine to reason about. Only decision-contract violations
    /// surface as errors.
    pub async fn submit(&self, query: &str, cancel: CancellationToken) -> Result<RouterReply> {
        let mut history = History::new(query);
        let max_turns = self.config.router.max_turns;

        tracing::info!(query, max_turns, "starting routing loop");

        for turn in 1..=max_turns {
            let decision = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(cancelled_reply(history)),
                decision = self.engine.decide(&history) => decision,
            };

            let decision = match decision {
                Ok(decision) => decision,
                Err(SwitchboardError::DecisionParse { raw }) => {
                    tracing::warn!(turn, "decision output did not parse");
                    history.record_agent_error(
                        DECISION_SOURCE,
                        format!(
                            "Invalid JSON. Please return ONLY valid JSON. Raw output: {}",
                            raw
                        ),
                    );
                    continue;
                }
                Err(SwitchboardError::Engine(reason)) => {
                    tracing::warn!(turn, %reason, "decision engine call failed");
                    history
                        .record_agent_error(DECISION_SOURCE, format!("Decision engine error: {}", reason));
                    continue;
                }
                Err(e) => return Err(e),
            };

            tracing::info!(turn, thought = %decision.thought, "router step");

            match decision.action {
                DecisionAction::FinalAnswer => {
                    let answer = decision.content.clone();
                    history.record_decision(decision);
                    tracing::info!(turn, "task complete");
                    return Ok(RouterReply {
                        answer,
                        outcome: Outcome::Done,
                        history: history.into_entries(),
                    });
                }
                DecisionAction::CallAgent => {
                    let agent = decision.agent_name.clone().ok_or_else(|| {
                        SwitchboardError::InvalidDecision(
                            "call_agent decision without agent_name".to_string(),
                        )
                    })?;
                    let content = decision.content.clone();
                    history.record_decision(decision);

                    match self.dispatch(&agent, &content, &mut history, &cancel).await {
                        Ok(()) => {}
                        Err(SwitchboardError::Cancelled) => return Ok(cancelled_reply(history)),
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        // Turn bound reached: hand back the best partial answer we have.
        let answer = history
            .last_dispatch_content()
            .map(str::to_string)
            .unwrap_or_else(|| EXHAUSTED_FALLBACK.to_string());

        tracing::warn!(max_turns, "turn bound reached without final answer");

        Ok(RouterReply {
            answer,
            outcome: Outcome::Exhausted,
            history: history.into_entries(),
        })
    }

    /// Execute one A2A call and record its result. Every transport
    /// failure becomes an error entry; only cancellation escapes.
    async fn dispatch(
        &self,
        agent: &str,
        content: &str,
        history: &mut History,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let Some(endpoint) = self.config.agents.get(agent) else {
            tracing::warn!(agent, "decision named an unconfigured agent");
            let available = self
                .config
                .agents
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            history.record_agent_error(
                agent,
                format!("Unknown agent '{}'. Available agents: {}", agent, available),
            );
            return Ok(());
        };

        tracing::info!(agent, url = %endpoint.url, "dispatching to agent");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SwitchboardError::Cancelled),
            result = self.client.create_task(&endpoint.url, content) => result,
        };

        match result {
            Ok(text) => {
                let preview: String = text.chars().take(RESPONSE_PREVIEW_CHARS).collect();
                tracing::debug!(agent, %preview, "agent response");
                history.record_agent_result(agent, text);
            }
            Err(e) => {
                tracing::warn!(agent, error = %e, "dispatch failed");
                history.record_agent_error(agent, format!("Error calling agent: {}", e));
            }
        }

        Ok(())
    }
}

fn cancelled_reply(history: History) -> RouterReply {
    tracing::info!("request cancelled by caller");
    RouterReply {
        answer: CANCELLED_ANSWER.to_string(),
        outcome: Outcome::Cancelled,
        history: history.into_entries(),
    }
}
