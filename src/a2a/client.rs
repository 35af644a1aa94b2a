//! A2A task client
//!
//! Sends one task request to a resolved agent endpoint and reduces the
//! response, whether a single JSON-RPC document or an SSE event stream,
//! to one textual result. Stateless apart from the shared card directory.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::a2a::directory::EndpointDirectory;
use crate::core::{Result, SwitchboardError, TransportConfig};

/// Fallback result when an agent closes the exchange without any payload
const NO_RESPONSE: &str = "No response received";

/// Transport seam for dispatching a task to a remote agent.
///
/// The router only depends on this trait, so tests can substitute a stub
/// transport for the real HTTP client.
#[async_trait]
pub trait TaskClient: Send + Sync {
    /// Send a message to the agent at `agent_url` and return its text reply
    async fn create_task(&self, agent_url: &str, message: &str) -> Result<String>;
}

/// HTTP implementation of [`TaskClient`] following the A2A protocol
pub struct A2aClient {
    client: Client,
    directory: Arc<EndpointDirectory>,
}

impl A2aClient {
    /// Create a client with the configured timeout classes and a fresh
    /// card directory
    pub fn from_config(config: &TransportConfig) -> Self {
        let client = Self::build_http_client(config);
        let directory = Arc::new(EndpointDirectory::new(client.clone()));
        Self { client, directory }
    }

    /// Create a client sharing an existing card directory
    pub fn with_directory(config: &TransportConfig, directory: Arc<EndpointDirectory>) -> Self {
        Self {
            client: Self::build_http_client(config),
            directory,
        }
    }

    /// The card directory this client resolves against
    pub fn directory(&self) -> Arc<EndpointDirectory> {
        Arc::clone(&self.directory)
    }

    fn build_http_client(config: &TransportConfig) -> Client {
        Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .read_timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(config.pool_timeout_secs))
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Build the JSON-RPC envelope for one message
    fn rpc_request(method: &str, message: &str) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": Uuid::new_v4().to_string(),
            "method": method,
            "params": {
                "message": {
                    "role": "user",
                    "parts": [{"kind": "text", "text": message}],
                    "messageId": Uuid::new_v4().to_string(),
                }
            }
        })
    }

    async fn send_blocking(&self, agent_url: &str, message: &str) -> Result<String> {
        let request = Self::rpc_request("message/send", message);

        let response = self
            .client
            .post(agent_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(agent_url, e))?;

        if !response.status().is_success() {
            return Err(SwitchboardError::DispatchUnreachable {
                url: agent_url.to_string(),
                reason: format!("agent returned {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_send_error(agent_url, e))?;

        if body.trim().is_empty() {
            return Ok(NO_RESPONSE.to_string());
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(extract_text(&value)),
            Err(_) => {
                tracing::warn!(url = agent_url, "non-JSON agent response, returning raw body");
                Ok(body)
            }
        }
    }

    async fn send_streaming(&self, agent_url: &str, message: &str) -> Result<String> {
        let request = Self::rpc_request("message/stream", message);

        let response = self
            .client
            .post(agent_url)
            .header(ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(agent_url, e))?;

        if !response.status().is_success() {
            return Err(SwitchboardError::DispatchUnreachable {
                url: agent_url.to_string(),
                reason: format!("agent returned {}", response.status()),
            });
        }

        let mut events: Vec<Value> = Vec::new();
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| map_send_error(agent_url, e))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));
            drain_sse_events(&mut buffer, &mut events);
        }

        // Process any remaining buffer content
        if !buffer.trim().is_empty() {
            buffer.push_str("\n\n");
            drain_sse_events(&mut buffer, &mut events);
        }

        // The final task snapshot carries the complete artifact; earlier
        // events are partial updates of the same text.
        let chosen = events
            .iter()
            .rev()
            .find(|event| event.pointer(ARTIFACT_TEXT_PATH).is_some())
            .or_else(|| events.last());

        match chosen {
            Some(event) => Ok(extract_text(event)),
            None => Ok(NO_RESPONSE.to_string()),
        }
    }
}

#[async_trait]
impl TaskClient for A2aClient {
    async fn create_task(&self, agent_url: &str, message: &str) -> Result<String> {
        let card = self.directory.resolve(agent_url).await?;

        tracing::debug!(
            url = agent_url,
            agent = %card.name,
            streaming = card.capabilities.streaming,
            "dispatching task"
        );

        if card.capabilities.streaming {
            self.send_streaming(agent_url, message).await
        } else {
            self.send_blocking(agent_url, message).await
        }
    }
}

/// Fixed extraction path: first artifact, first part, its text field
const ARTIFACT_TEXT_PATH: &str = "/result/artifacts/0/parts/0/text";

/// Extract the result text from a response envelope.
///
/// When the expected artifact path is absent the whole response is
/// stringified instead of failing, so a malformed-but-present response
/// never crashes the router loop.
fn extract_text(response: &Value) -> String {
    if let Some(text) = response.pointer(ARTIFACT_TEXT_PATH).and_then(Value::as_str) {
        return text.to_string();
    }

    tracing::warn!("response missing artifact text path, stringifying whole payload");
    response.to_string()
}

/// Split complete `data:` SSE events out of the buffer, leaving any
/// partial event for the next chunk
fn drain_sse_events(buffer: &mut String, events: &mut Vec<Value>) {
    while let Some(pos) = buffer.find("\n\n") {
        let event = buffer[..pos].to_string();
        *buffer = buffer[pos + 2..].to_string();

        for line in event.lines() {
            if let Some(data) = line.strip_prefix("data:") {
                match serde_json::from_str::<Value>(data.trim()) {
                    Ok(value) => events.push(value),
                    Err(e) => tracing::debug!(error = %e, "skipping unparseable SSE event"),
                }
            }
        }
    }
}

fn map_send_error(url: &str, e: reqwest::Error) -> SwitchboardError {
    if e.is_timeout() {
        SwitchboardError::DispatchTimeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        SwitchboardError::DispatchUnreachable {
            url: url.to_string(),
            reason: e.to_string(),
        }
    } else {
        SwitchboardError::Http(e)
    }
}
