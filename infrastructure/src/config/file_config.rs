//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the config file. They
//! are deserialized directly; typed accessors turn sections into the
//! values the rest of the system consumes.

use parley_application::config::ChatParams;
use parley_domain::CatalogPolicy;
use parley_domain::catalog::{DEFAULT_ALLOWED_FAMILIES, DEFAULT_DENIED_FRAGMENTS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors detected while turning raw config into typed settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The vault cannot operate without a master key.
    #[error("vault.master_key is not configured (set PARLEY_VAULT__MASTER_KEY)")]
    MissingMasterKey,

    #[error("config error: {0}")]
    Invalid(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider endpoint and deployment-wide fallback credential
    pub provider: FileProviderConfig,
    /// Credential vault settings
    pub vault: FileVaultConfig,
    /// Conversation settings
    pub chat: FileChatConfig,
    /// Session store settings
    pub sessions: FileSessionsConfig,
    /// Model catalog filtering
    pub catalog: FileCatalogConfig,
    /// Structured chat log
    pub log: FileLogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// OpenAI-compatible API root.
    pub base_url: String,
    /// Process-wide fallback API key; usually supplied via environment.
    pub default_api_key: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: crate::providers::groq::DEFAULT_BASE_URL.to_string(),
            default_api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVaultConfig {
    /// Base64-encoded 32-byte master key; usually supplied via environment.
    pub master_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Inline system instruction. Takes precedence over the path.
    pub system_prompt: Option<String>,
    /// File to read the system instruction from.
    pub system_prompt_path: Option<String>,
    /// Resend only the last K transcript turns. Unset resends everything.
    pub keep_last_turns: Option<usize>,
    /// Completion deadline in seconds. 0 disables the deadline.
    pub completion_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionsConfig {
    /// Cap on live sessions; least-recently-active is evicted past it.
    /// Unset means unbounded.
    pub max_sessions: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    pub allowed_families: Vec<String>,
    pub denied_fragments: Vec<String>,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            allowed_families: DEFAULT_ALLOWED_FAMILIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            denied_fragments: DEFAULT_DENIED_FRAGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// JSONL file for chat exchange records. Unset disables the log.
    pub chat_log_path: Option<String>,
}

impl FileConfig {
    /// The vault master key; its absence is fatal at startup.
    pub fn master_key(&self) -> Result<&str, ConfigError> {
        self.vault
            .master_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingMasterKey)
    }

    /// Resolve conversation parameters, reading the system prompt file if
    /// one is configured. An unreadable prompt file falls back to the
    /// generic default instruction rather than failing startup.
    pub fn chat_params(&self) -> ChatParams {
        let mut params = ChatParams::default();

        if let Some(prompt) = &self.chat.system_prompt {
            params = params.with_system_prompt(prompt.trim());
        } else if let Some(path) = &self.chat.system_prompt_path {
            match std::fs::read_to_string(path) {
                Ok(contents) => params = params.with_system_prompt(contents.trim()),
                Err(e) => {
                    warn!("could not read system prompt from {}: {}", path, e);
                }
            }
        }

        params = params.with_keep_last_turns(self.chat.keep_last_turns);
        if let Some(secs) = self.chat.completion_timeout_secs {
            let timeout = (secs > 0).then(|| Duration::from_secs(secs));
            params = params.with_completion_timeout(timeout);
        }
        params
    }

    pub fn catalog_policy(&self) -> CatalogPolicy {
        CatalogPolicy::new(
            self.catalog.allowed_families.iter().cloned(),
            self.catalog.denied_fragments.iter().cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_application::config::DEFAULT_SYSTEM_PROMPT;
    use std::io::Write;

    #[test]
    fn defaults_parse_from_empty_toml() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(
            config.provider.base_url,
            crate::providers::groq::DEFAULT_BASE_URL
        );
        assert!(config.vault.master_key.is_none());
        assert!(config.sessions.max_sessions.is_none());
    }

    #[test]
    fn missing_master_key_is_an_error() {
        let config = FileConfig::default();
        assert!(matches!(
            config.master_key().unwrap_err(),
            ConfigError::MissingMasterKey
        ));

        let mut config = FileConfig::default();
        config.vault.master_key = Some("  ".to_string());
        assert!(config.master_key().is_err());
    }

    #[test]
    fn inline_prompt_beats_path() {
        let mut config = FileConfig::default();
        config.chat.system_prompt = Some("Inline wins.".to_string());
        config.chat.system_prompt_path = Some("/nonexistent/prompt.txt".to_string());
        assert_eq!(config.chat_params().system_prompt, "Inline wins.");
    }

    #[test]
    fn prompt_file_is_read_and_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "You are a pirate.\n").unwrap();

        let mut config = FileConfig::default();
        config.chat.system_prompt_path = Some(file.path().to_string_lossy().into_owned());
        assert_eq!(config.chat_params().system_prompt, "You are a pirate.");
    }

    #[test]
    fn unreadable_prompt_file_falls_back_to_default() {
        let mut config = FileConfig::default();
        config.chat.system_prompt_path = Some("/nonexistent/prompt.txt".to_string());
        assert_eq!(config.chat_params().system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let mut config = FileConfig::default();
        config.chat.completion_timeout_secs = Some(0);
        assert_eq!(config.chat_params().completion_timeout, None);

        config.chat.completion_timeout_secs = Some(30);
        assert_eq!(
            config.chat_params().completion_timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn catalog_section_round_trips() {
        let toml = r#"
            [catalog]
            allowed_families = ["falcon"]
            denied_fragments = ["vision"]
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        let policy = config.catalog_policy();
        assert!(policy.accepts("falcon-40b"));
        assert!(!policy.accepts("falcon-vision"));
        assert!(!policy.accepts("llama-x-8b"));
    }
}
