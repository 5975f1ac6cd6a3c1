//! Model catalog filtering policy
//!
//! Decides which provider-offered models are presented to users: keep
//! open-weight chat families, drop audio/transcription models, and sort
//! deterministically. The fetch itself lives in the infrastructure
//! gateway; this policy is pure so it can be tested against fixtures.

use crate::core::model::ModelInfo;

/// Model id fragments that mark a chat model family worth offering.
pub const DEFAULT_ALLOWED_FAMILIES: &[&str] = &[
    "llama", "mixtral", "mistral", "gemma", "qwen", "deepseek", "gpt-oss",
];

/// Model id fragments that disqualify a model even when a family matches
/// (speech-to-text and text-to-speech variants share family names).
pub const DEFAULT_DENIED_FRAGMENTS: &[&str] = &["whisper", "audio", "tts"];

/// Filtering policy for the model catalog.
#[derive(Debug, Clone)]
pub struct CatalogPolicy {
    allowed_families: Vec<String>,
    denied_fragments: Vec<String>,
}

impl CatalogPolicy {
    pub fn new(
        allowed_families: impl IntoIterator<Item = String>,
        denied_fragments: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            allowed_families: allowed_families
                .into_iter()
                .map(|f| f.to_lowercase())
                .collect(),
            denied_fragments: denied_fragments
                .into_iter()
                .map(|f| f.to_lowercase())
                .collect(),
        }
    }

    /// Whether a model id passes the allow/deny fragment policy.
    ///
    /// Matching is case-insensitive substring matching on the id.
    pub fn accepts(&self, model_id: &str) -> bool {
        let id = model_id.to_lowercase();
        if !self.allowed_families.iter().any(|f| id.contains(f)) {
            return false;
        }
        !self.denied_fragments.iter().any(|f| id.contains(f))
    }

    /// Apply the policy to a provider listing: filter, then sort ascending
    /// by model id for stable presentation.
    pub fn apply(&self, models: Vec<ModelInfo>) -> Vec<ModelInfo> {
        let mut kept: Vec<ModelInfo> = models
            .into_iter()
            .filter(|m| self.accepts(m.id.as_str()))
            .collect();
        kept.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        kept
    }
}

impl Default for CatalogPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALLOWED_FAMILIES.iter().map(|s| s.to_string()),
            DEFAULT_DENIED_FRAGMENTS.iter().map(|s| s.to_string()),
        )
    }
}
