//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.

use super::transport::TransportConfig;
use super::transport::config::parse_flag;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default Graph API host.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";

/// Default Graph API version segment.
pub const DEFAULT_GRAPH_API_VERSION: &str = "v21.0";

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// WhatsApp Business Cloud API configuration.
    pub whatsapp: WhatsAppConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Credentials and endpoint settings for the WhatsApp Business Cloud API.
///
/// Loading never fails. The access token and phone-number id are checked
/// when the `WhatsAppManager` is built, so a missing credential stops the
/// server before it accepts any call.
#[derive(Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// System-user or temporary access token for the Graph API.
    pub access_token: Option<String>,

    /// Phone-number id messages are sent from.
    pub phone_number_id: Option<String>,

    /// WhatsApp Business Account id. Not used by any current operation.
    pub business_account_id: Option<String>,

    /// Graph API host, without version.
    pub base_url: String,

    /// Graph API version path segment, e.g. `v21.0`.
    pub api_version: String,

    /// Per-request timeout applied by the Graph client, in seconds.
    pub timeout_secs: u64,
}

impl WhatsAppConfig {
    /// Versioned Graph API root every endpoint is resolved against.
    pub fn graph_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("phone_number_id", &self.phone_number_id)
            .field("business_account_id", &self.business_account_id)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            business_account_id: None,
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            api_version: DEFAULT_GRAPH_API_VERSION.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "whatsapp-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            whatsapp: WhatsAppConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings are read from `MCP_*` variables, WhatsApp credentials
    /// from `WHATSAPP_*` and Graph endpoint settings from `GRAPH_API_*`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = parse_flag(&timestamps);
        }

        config.transport = TransportConfig::from_env();

        config.whatsapp = WhatsAppConfig::from_env();

        config
    }
}

impl WhatsAppConfig {
    /// Load WhatsApp and Graph API settings from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            access_token: non_empty_var("WHATSAPP_ACCESS_TOKEN"),
            phone_number_id: non_empty_var("WHATSAPP_PHONE_NUMBER_ID"),
            business_account_id: non_empty_var("WHATSAPP_BUSINESS_ACCOUNT_ID"),
            ..Self::default()
        };

        if config.access_token.is_some() {
            info!("WhatsApp access token loaded from environment");
        } else {
            warn!("WHATSAPP_ACCESS_TOKEN not set - the server will refuse to start");
        }

        if let Some(base_url) = non_empty_var("GRAPH_API_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(version) = non_empty_var("GRAPH_API_VERSION") {
            config.api_version = version;
        }

        if let Ok(timeout) = std::env::var("GRAPH_API_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.timeout_secs = secs,
                Err(_) => warn!(
                    "Ignoring invalid GRAPH_API_TIMEOUT_SECS '{}', using {}s",
                    timeout, config.timeout_secs
                ),
            }
        }

        config
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_whatsapp_credentials_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("WHATSAPP_ACCESS_TOKEN", "EAAG-test-token");
            std::env::set_var("WHATSAPP_PHONE_NUMBER_ID", "1234567890");
            std::env::set_var("GRAPH_API_VERSION", "v19.0");
        }
        let config = Config::from_env();
        assert_eq!(config.whatsapp.access_token.as_deref(), Some("EAAG-test-token"));
        assert_eq!(config.whatsapp.phone_number_id.as_deref(), Some("1234567890"));
        assert_eq!(config.whatsapp.graph_url(), "https://graph.facebook.com/v19.0");
        unsafe {
            std::env::remove_var("WHATSAPP_ACCESS_TOKEN");
            std::env::remove_var("WHATSAPP_PHONE_NUMBER_ID");
            std::env::remove_var("GRAPH_API_VERSION");
        }
    }

    #[test]
    fn test_blank_credentials_are_treated_as_missing() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("WHATSAPP_ACCESS_TOKEN", "   ");
            std::env::remove_var("WHATSAPP_PHONE_NUMBER_ID");
        }
        let config = WhatsAppConfig::from_env();
        assert!(config.access_token.is_none());
        assert!(config.phone_number_id.is_none());
        unsafe {
            std::env::remove_var("WHATSAPP_ACCESS_TOKEN");
        }
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("GRAPH_API_TIMEOUT_SECS", "soon");
        }
        let config = WhatsAppConfig::from_env();
        assert_eq!(config.timeout_secs, 30);
        unsafe {
            std::env::remove_var("GRAPH_API_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_access_token_redacted_in_debug() {
        let config = WhatsAppConfig {
            access_token: Some("super_secret_token".to_string()),
            ..WhatsAppConfig::default()
        };
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));
    }

    #[test]
    fn test_graph_url_trims_slashes() {
        let config = WhatsAppConfig {
            base_url: "http://localhost:9000/".to_string(),
            api_version: "/v21.0/".to_string(),
            ..WhatsAppConfig::default()
        };
        assert_eq!(config.graph_url(), "http://localhost:9000/v21.0");
    }
}
