//! Configuration schema for Lumen.

use serde::{Deserialize, Serialize};

/// Root config for the Lumen SDK, server, and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LumenConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// External image model endpoint and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            customer_id: None,
        }
    }
}

/// Default chat-completions endpoint for the image model.
fn default_endpoint() -> String {
    "https://oi-server.onrender.com/chat/completions".to_string()
}

/// Default image model identifier.
fn default_model() -> String {
    "replicate/black-forest-labs/flux-1.1-pro".to_string()
}

/// Bind address for the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Backend used for the record store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// One file per key under a directory.
    #[default]
    File,
    /// Process-local map, discarded on exit.
    Memory,
}

/// Record storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    /// Directory for the file backend (defaults to `~/.lumen/store`).
    #[serde(default)]
    pub path: Option<String>,
}

/// Limits applied to generation requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationConfig {
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_prompt_chars: default_max_prompt_chars(),
        }
    }
}

/// Default maximum prompt length in characters.
fn default_max_prompt_chars() -> usize {
    1000
}
