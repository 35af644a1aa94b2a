//! Configuration management for Switchboard
//!
//! Supports environment variables, config files, and runtime overrides.
//! Agent endpoints and models are interchangeable via settings.
//!
//! Config file location: ~/.config/switchboard/config.toml

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{Result, SwitchboardError};

/// Main configuration for Switchboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini decision engine configuration
    pub gemini: GeminiConfig,
    /// Transport timeouts for A2A calls
    #[serde(default)]
    pub transport: TransportConfig,
    /// Router loop configuration
    #[serde(default)]
    pub router: RouterConfig,
    /// Specialist agents, keyed by the name the decision engine uses
    pub agents: BTreeMap<String, AgentEndpoint>,
}

/// Gemini API configuration for the decision engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key (default from GOOGLE_API_KEY)
    pub api_key: String,
    /// Model name (default: gemini-2.0-flash)
    pub model: String,
    /// API base URL
    pub base_url: String,
}

/// Timeout classes for one A2A transport session.
///
/// `timeout_secs` is the overall budget and also bounds the response read.
/// Request writes share the overall deadline; reqwest has no separate
/// write knob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Overall and read timeout in seconds
    pub timeout_secs: u64,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
    /// Request write timeout in seconds
    pub write_timeout_secs: u64,
    /// Connection pool idle timeout in seconds
    pub pool_timeout_secs: u64,
}

/// Router loop behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Maximum reasoning turns before giving up
    /// Default: 15
    pub max_turns: usize,
    /// Whether to show debug output
    pub debug: bool,
}

/// One specialist agent endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEndpoint {
    /// Base URL of the agent's A2A server
    pub url: String,
    /// Capability summary shown to the decision engine
    pub description: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            transport: TransportConfig::default(),
            router: RouterConfig::default(),
            agents: default_agents(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 240,
            connect_timeout_secs: 10,
            write_timeout_secs: 10,
            pool_timeout_secs: 5,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_turns: 15,
            debug: env::var("SWITCHBOARD_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// The two specialist agents of the customer service deployment.
/// Host and port are overridable per agent via environment.
fn default_agents() -> BTreeMap<String, AgentEndpoint> {
    let mut agents = BTreeMap::new();
    agents.insert(
        "customer_data".to_string(),
        AgentEndpoint {
            url: url_from_env("CUSTOMER_DATA_HOST", "CUSTOMER_DATA_PORT", 10020),
            description: "Get customer details, list customers, update records, \
                          get ticket history, create tickets."
                .to_string(),
        },
    );
    agents.insert(
        "support_agent".to_string(),
        AgentEndpoint {
            url: url_from_env("SUPPORT_HOST", "SUPPORT_PORT", 10021),
            description: "General support advice, troubleshooting, escalation decisions."
                .to_string(),
        },
    );
    agents
}

fn url_from_env(host_var: &str, port_var: &str, default_port: u16) -> String {
    let host = env::var(host_var).unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var(port_var)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(default_port);
    format!("http://{}:{}", host, port)
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("switchboard")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(SwitchboardError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| SwitchboardError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| SwitchboardError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable: every agent URL must parse
    /// and the turn bound must be nonzero.
    pub fn validate(&self) -> Result<()> {
        if self.router.max_turns == 0 {
            return Err(SwitchboardError::config("max_turns must be at least 1"));
        }
        for (name, endpoint) in &self.agents {
            url::Url::parse(&endpoint.url).map_err(|e| {
                SwitchboardError::config(format!("Invalid URL for agent '{}': {}", name, e))
            })?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                SwitchboardError::config(format!("Failed to create config dir: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SwitchboardError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| SwitchboardError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Save configuration and return the path
    pub fn save_and_get_path(&self) -> Result<PathBuf> {
        self.save()?;
        Ok(Self::config_file())
    }

    /// Check if a config file exists
    pub fn config_exists() -> bool {
        Self::config_file().exists()
    }

    /// Look up a configured agent endpoint by name
    pub fn agent(&self, name: &str) -> Option<&AgentEndpoint> {
        self.agents.get(name)
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.router.max_turns, 15);
        assert_eq!(config.transport.timeout_secs, 240);
        assert_eq!(config.transport.connect_timeout_secs, 10);
        assert_eq!(config.transport.pool_timeout_secs, 5);
        assert!(config.agents.contains_key("customer_data"));
        assert!(config.agents.contains_key("support_agent"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("customer_data"));
        assert!(toml_str.contains("max_turns"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.router.max_turns, config.router.max_turns);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        config.agents.insert(
            "broken".to_string(),
            AgentEndpoint {
                url: "not a url".to_string(),
                description: String::new(),
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_turns() {
        let mut config = Config::default();
        config.router.max_turns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("switchboard"));
    }
}
