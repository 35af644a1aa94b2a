//! Endpoint directory with per-process agent card caching
//!
//! The directory is the only state shared between concurrent requests.
//! Cards are fetched once per base URL and then served from the cache for
//! the process lifetime; failed fetches are not cached, so the next
//! resolution retries from scratch.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use tokio::sync::RwLock;

use crate::a2a::card::{AgentCard, AGENT_CARD_WELL_KNOWN_PATH};
use crate::core::{Result, SwitchboardError};

/// Resolves agent base URLs to their cards
pub struct EndpointDirectory {
    client: Client,
    cards: RwLock<HashMap<String, Arc<AgentCard>>>,
}

impl EndpointDirectory {
    /// Create a directory using the given HTTP client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cards: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve an agent's card, fetching it on first use.
    ///
    /// Concurrent resolutions of the same uncached URL may both fetch; the
    /// insert is idempotent so the duplicate is harmless.
    pub async fn resolve(&self, base_url: &str) -> Result<Arc<AgentCard>> {
        if let Some(card) = self.cards.read().await.get(base_url) {
            return Ok(Arc::clone(card));
        }

        let card = Arc::new(self.fetch_card(base_url).await?);
        self.cards
            .write()
            .await
            .insert(base_url.to_string(), Arc::clone(&card));

        tracing::debug!(url = base_url, agent = %card.name, "agent card cached");
        Ok(card)
    }

    /// Whether a card for this URL is already cached
    pub async fn is_cached(&self, base_url: &str) -> bool {
        self.cards.read().await.contains_key(base_url)
    }

    async fn fetch_card(&self, base_url: &str) -> Result<AgentCard> {
        let card_url = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            AGENT_CARD_WELL_KNOWN_PATH
        );

        let response = self
            .client
            .get(&card_url)
            .send()
            .await
            .map_err(|e| SwitchboardError::unreachable(base_url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(SwitchboardError::unreachable(
                base_url,
                format!("agent card fetch returned {}", response.status()),
            ));
        }

        response
            .json::<AgentCard>()
            .await
            .map_err(|e| SwitchboardError::unreachable(base_url, format!("bad agent card: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_nothing_cached_initially() {
        let directory = EndpointDirectory::new(Client::new());
        assert!(!directory.is_cached("http://127.0.0.1:10020").await);
    }

    #[tokio::test]
    async fn test_failed_resolution_not_cached() {
        // Port 1 is unassigned; the connection is refused immediately.
        let directory = EndpointDirectory::new(Client::new());
        let result = directory.resolve("http://127.0.0.1:1").await;
        assert!(matches!(
            result,
            Err(SwitchboardError::EndpointUnreachable { .. })
        ));
        assert!(!directory.is_cached("http://127.0.0.1:1").await);
    }
}
