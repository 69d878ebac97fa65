//! Configuration loader for claimchat.
//!
//! Reads `config.toml` from the data directory (`~/.claimchat/` in
//! production) and deserializes it into [`ClaimchatConfig`]. Falls back to
//! defaults when the file is missing or malformed.
//!
//! Secrets are read from the environment only and wrapped in
//! [`SecretString`] straight away.

use std::path::Path;

use secrecy::SecretString;

use claimchat_types::config::ClaimchatConfig;

/// OpenAI key used by the client for direct completion requests.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI key used by the relay server for upstream requests.
pub const RELAY_API_KEY_ENV: &str = "CUSTOM_OPENAI_API_KEY";

/// Bearer token the client presents to the relay.
pub const ACCESS_TOKEN_ENV: &str = "CLAIMCHAT_ACCESS_TOKEN";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClaimchatConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> ClaimchatConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClaimchatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClaimchatConfig::default();
        }
    };

    match toml::from_str::<ClaimchatConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClaimchatConfig::default()
        }
    }
}

/// Read a secret from the environment. Blank values count as unset.
pub fn secret_from_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.openai.model, "gpt-3.5-turbo");
        assert_eq!(config.server.port, 8787);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[relay]
url = "https://example.supabase.co/functions/v1/chat"

[openai]
max_attempts = 5
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.relay.url, "https://example.supabase.co/functions/v1/chat");
        assert_eq!(config.openai.max_attempts, 5);
        assert_eq!(config.openai.max_completion_tokens, 2000);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.openai.max_attempts, 3);
    }

    #[test]
    fn secret_from_env_ignores_blank_values() {
        // SAFETY: test-only env mutation on a variable no other test reads.
        unsafe {
            std::env::set_var("CLAIMCHAT_TEST_SECRET_BLANK", "   ");
            std::env::set_var("CLAIMCHAT_TEST_SECRET_SET", " sk-test ");
        }
        assert!(secret_from_env("CLAIMCHAT_TEST_SECRET_BLANK").is_none());
        assert!(secret_from_env("CLAIMCHAT_TEST_SECRET_UNSET").is_none());
        assert_eq!(
            secret_from_env("CLAIMCHAT_TEST_SECRET_SET").unwrap().expose_secret(),
            "sk-test"
        );
    }
}
