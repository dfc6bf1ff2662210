//! Configuration for the facade and the standalone binary.

use config::{Config as ConfigCrate, Environment};
use serde::Deserialize;

fn default_secret() -> String {
    "secret".to_string()
}

/// Facade configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalTokenConfig {
    /// Audience, aka the client id. Set as `payload.aud` by the audience
    /// conformance hook and used to build the pre-built clients.
    pub audience: String,
    /// Client secret. The placeholder default is acceptable only for local
    /// testing, never production.
    #[serde(default = "default_secret")]
    pub secret: String,
}

impl LocalTokenConfig {
    pub fn new(audience: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            secret: secret.into(),
        }
    }

    /// Reads `LOCAL_TOKENS_AUDIENCE` and `LOCAL_TOKENS_SECRET` from the
    /// environment. The audience is required.
    pub fn from_env() -> Result<Self, String> {
        ConfigCrate::builder()
            .add_source(Environment::with_prefix("LOCAL_TOKENS").prefix_separator("_"))
            .build()
            .map_err(|e| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }
}

impl From<&str> for LocalTokenConfig {
    fn from(audience: &str) -> Self {
        Self {
            audience: audience.to_string(),
            secret: default_secret(),
        }
    }
}

impl From<String> for LocalTokenConfig {
    fn from(audience: String) -> Self {
        Self {
            audience,
            secret: default_secret(),
        }
    }
}

fn default_audience() -> String {
    "local-tokens".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "localhost".to_string()
}

/// Settings for the standalone `local-tokens` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeSettings {
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_secret")]
    pub secret: String,
    /// Port to listen on (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            audience: default_audience(),
            secret: default_secret(),
            port: default_port(),
            host: default_host(),
        }
    }
}

impl ServeSettings {
    /// Creates settings from `LOCAL_TOKENS_*` environment variables.
    pub fn from_env() -> Result<Self, String> {
        ConfigCrate::builder()
            .add_source(Environment::with_prefix("LOCAL_TOKENS").prefix_separator("_"))
            .build()
            .map_err(|e| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }
}
