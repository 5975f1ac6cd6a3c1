//! Model identity and catalog metadata value objects

use serde::{Deserialize, Serialize};

/// Baseline model used when a user has no stored preference.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Context window assumed when the provider omits one.
pub const DEFAULT_CONTEXT_WINDOW: u32 = 8192;

/// Identifier of a provider-hosted model (Value Object)
///
/// Model ids are opaque provider strings ("llama-3.3-70b-versatile",
/// "mixtral-8x7b-32768", ...); the domain never enumerates them, it only
/// carries the user's choice around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self(DEFAULT_MODEL.to_string())
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A provider-offered model as presented to the user (Value Object)
///
/// Transient: fetched on demand from the provider, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: ModelId,
    pub display_name: String,
    pub context_window: u32,
    pub owned_by: String,
}

impl ModelInfo {
    /// Build a `ModelInfo` from provider fields, deriving the display name
    /// from the id when the provider does not supply one.
    pub fn from_provider(
        id: impl Into<String>,
        display_name: Option<String>,
        context_window: Option<u32>,
        owned_by: Option<String>,
    ) -> Self {
        let id = id.into();
        let display_name = display_name.unwrap_or_else(|| derive_display_name(&id));
        Self {
            id: ModelId::new(id),
            display_name,
            context_window: context_window.unwrap_or(DEFAULT_CONTEXT_WINDOW),
            owned_by: owned_by.unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// Derive a human-readable name from a model id: separators become
/// spaces and the id is title-cased, with any letter following a
/// non-letter starting a new word ("llama-3.3-70b-versatile" ->
/// "Llama 3.3 70B Versatile").
pub fn derive_display_name(id: &str) -> String {
    let mut name = String::with_capacity(id.len());
    let mut prev_alphabetic = false;
    for c in id.chars() {
        if matches!(c, '-' | '_' | '/') {
            if !name.is_empty() && !name.ends_with(' ') {
                name.push(' ');
            }
            prev_alphabetic = false;
        } else if c.is_alphabetic() {
            if prev_alphabetic {
                name.extend(c.to_lowercase());
            } else {
                name.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            name.push(c);
            prev_alphabetic = false;
        }
    }
    name.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_id() {
        assert_eq!(ModelId::default().as_str(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn model_id_serde_is_transparent() {
        let id = ModelId::new("mixtral-8x7b-32768");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"mixtral-8x7b-32768\""
        );
        let back: ModelId = serde_json::from_str("\"mixtral-8x7b-32768\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_name_derivation() {
        assert_eq!(
            derive_display_name("llama-3.3-70b-versatile"),
            "Llama 3.3 70B Versatile"
        );
        assert_eq!(derive_display_name("gpt-oss-20b"), "Gpt Oss 20B");
        assert_eq!(derive_display_name("meta/llama_guard"), "Meta Llama Guard");
        // A letter after a digit starts a new word, as in mixed ids
        assert_eq!(derive_display_name("mixtral-8x7b-32768"), "Mixtral 8X7B 32768");
    }

    #[test]
    fn provider_name_wins_over_derivation() {
        let info = ModelInfo::from_provider(
            "gemma2-9b-it",
            Some("Gemma 2 9B".to_string()),
            Some(8192),
            Some("google".to_string()),
        );
        assert_eq!(info.display_name, "Gemma 2 9B");
    }

    #[test]
    fn missing_provider_fields_get_defaults() {
        let info = ModelInfo::from_provider("qwen-32b", None, None, None);
        assert_eq!(info.display_name, "Qwen 32B");
        assert_eq!(info.context_window, DEFAULT_CONTEXT_WINDOW);
        assert_eq!(info.owned_by, "unknown");
    }
}
