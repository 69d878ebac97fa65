//! Configuration types for claimchat.
//!
//! `ClaimchatConfig` represents the top-level `config.toml` in the data
//! directory. Every field has a default so a missing file is valid.
//! Secrets (API keys, access tokens) never live here; they come from the
//! environment.

use serde::{Deserialize, Serialize};

/// System prompt prepended to every upstream completion request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert AI assistant specializing in Canadian personal injury law. Your role is to provide detailed, accurate, and helpful information about personal injury claims, compensation, legal processes, and rights in Canada.

Key responsibilities:
- Provide clear explanations of Canadian personal injury law concepts
- Explain the claims process step-by-step
- Discuss different types of compensation available
- Explain limitation periods and important deadlines
- Provide information about when legal representation is beneficial
- Discuss provincial variations in personal injury law when relevant

Important guidelines:
- Always clarify that you provide general information, not legal advice
- Recommend consulting with a qualified personal injury lawyer for specific cases
- Be empathetic and understanding when discussing injuries and claims
- Provide detailed, comprehensive answers
- Use clear language while maintaining legal accuracy
- Reference specific Canadian laws and regulations when relevant";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimchatConfig {
    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the client posts `{ messages }` when no OpenAI key is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_relay_url")]
    pub url: String,

    /// Connect timeout for the relay request. Reads are never timed out.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_relay_url() -> String {
    "http://127.0.0.1:8787/functions/v1/chat".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Settings for talking to the OpenAI chat completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,

    /// Attempts made when the endpoint answers 429, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_completion_tokens() -> u32 {
    2000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_completion_tokens: default_max_completion_tokens(),
            max_attempts: default_max_attempts(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Bind address for the relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
