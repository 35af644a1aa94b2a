//! Gemini-backed decision engine
//!
//! Async HTTP client for the Gemini generateContent API. The history is
//! rendered into alternating user/model turns and the reply is parsed
//! against the decision schema.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::{Config, Decision, GeminiConfig, HistoryEntry, Result, SwitchboardError};
use crate::decision::{parse_decision, DecisionEngine, DECISION_SOURCE};
use crate::router::History;

/// Decision engine backed by a Gemini model
pub struct GeminiEngine {
    client: Client,
    config: GeminiConfig,
    system_prompt: String,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiEngine {
    /// Create an engine from the full application config, deriving the
    /// routing instructions from the configured agent roster
    pub fn from_config(config: &Config) -> Self {
        let system_prompt = crate::decision::build_system_prompt(&config.agents);
        Self::new(config.gemini.clone(), system_prompt)
    }

    /// Create an engine with explicit routing instructions
    pub fn new(config: GeminiConfig, system_prompt: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            system_prompt,
        }
    }

    /// Render the history into Gemini `contents` turns.
    ///
    /// The routing instructions ride in the first user turn together with
    /// the query; decisions come back as model turns; agent results and
    /// decision failures are fed back as user turns.
    fn render_contents(&self, history: &History) -> Vec<Value> {
        let mut contents = Vec::with_capacity(history.len());

        for entry in history.entries() {
            let (role, text) = match entry {
                HistoryEntry::UserQuery { text } => (
                    "user",
                    format!("{}\n\nUser Query: {}", self.system_prompt, text),
                ),
                HistoryEntry::Decision(decision) => (
                    "model",
                    serde_json::to_string(decision).unwrap_or_else(|_| decision.content.clone()),
                ),
                HistoryEntry::AgentResult { agent, text, .. } if agent == DECISION_SOURCE => {
                    ("user", text.clone())
                }
                HistoryEntry::AgentResult { agent, text, .. } => {
                    ("user", format!("Result from {}: {}", agent, text))
                }
            };
            contents.push(json!({"role": role, "parts": [{"text": text}]}));
        }

        contents
    }
}

#[async_trait]
impl DecisionEngine for GeminiEngine {
    async fn decide(&self, history: &History) -> Result<Decision> {
        let body = json!({"contents": self.render_contents(history)});
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SwitchboardError::engine(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SwitchboardError::engine(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SwitchboardError::engine(format!("Bad Gemini response: {}", e)))?;

        let raw = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| SwitchboardError::engine("Gemini returned no candidates"))?;

        parse_decision(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Decision;

    fn engine() -> GeminiEngine {
        GeminiEngine::new(
            GeminiConfig {
                api_key: "test-key".to_string(),
                model: "gemini-2.0-flash".to_string(),
                base_url: "http://127.0.0.1:1".to_string(),
            },
            "You are the Router Agent.".to_string(),
        )
    }

    #[test]
    fn test_render_first_turn_carries_instructions_and_query() {
        let history = History::new("get id 5");
        let contents = engine().render_contents(&history);

        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        let text = contents[0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("You are the Router Agent."));
        assert!(text.contains("User Query: get id 5"));
    }

    #[test]
    fn test_render_roles_alternate_with_exchange() {
        let mut history = History::new("get id 5");
        history.record_decision(Decision::call_agent("lookup", "customer_data", "Get 5"));
        history.record_agent_result("customer_data", "id=5,name=Charlie");

        let contents = engine().render_contents(&history);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");

        let result_turn = contents[2]["parts"][0]["text"].as_str().unwrap();
        assert_eq!(result_turn, "Result from customer_data: id=5,name=Charlie");
    }

    #[test]
    fn test_render_decision_failures_without_result_prefix() {
        let mut history = History::new("get id 5");
        history.record_agent_error(
            DECISION_SOURCE,
            "Invalid JSON. Please return ONLY valid JSON.",
        );

        let contents = engine().render_contents(&history);
        let retry_turn = contents[1]["parts"][0]["text"].as_str().unwrap();
        assert_eq!(retry_turn, "Invalid JSON. Please return ONLY valid JSON.");
    }

    #[test]
    fn test_response_shape_parses() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "{\"thought\": \"t\", \"action\": \"final_answer\", \"content\": \"ok\"}"}],
                    "role": "model"
                }
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert!(parsed.candidates[0].content.parts[0]
            .text
            .contains("final_answer"));
    }
}
