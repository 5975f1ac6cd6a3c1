//! Conversation parameters: use case timing and prompt control.
//!
//! [`ChatParams`] groups the static parameters that control the
//! [`ConverseUseCase`](crate::use_cases::converse::ConverseUseCase) and the
//! credential probes. These are application-layer concerns, not domain
//! policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generic instruction used when no system prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Conversation control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatParams {
    /// System instruction prepended to every completion call.
    pub system_prompt: String,
    /// Deadline for a completion call. `None` means no deadline.
    pub completion_timeout: Option<Duration>,
    /// Deadline for validation and model-listing probes. These calls must
    /// never block indefinitely.
    pub probe_timeout: Duration,
    /// Resend only the last K turns of the transcript. `None` resends
    /// everything.
    pub keep_last_turns: Option<usize>,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            completion_timeout: Some(Duration::from_secs(120)),
            probe_timeout: Duration::from_secs(10),
            keep_last_turns: None,
        }
    }
}

impl ChatParams {
    // ==================== Builder Methods ====================

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_keep_last_turns(mut self, turns: Option<usize>) -> Self {
        self.keep_last_turns = turns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensible_defaults() {
        let params = ChatParams::default();
        assert_eq!(params.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(params.probe_timeout, Duration::from_secs(10));
        // Full transcript is resent unless truncation is opted into
        assert_eq!(params.keep_last_turns, None);
    }

    #[test]
    fn builder_chains() {
        let params = ChatParams::default()
            .with_system_prompt("Be terse.")
            .with_completion_timeout(None)
            .with_keep_last_turns(Some(20));
        assert_eq!(params.system_prompt, "Be terse.");
        assert_eq!(params.completion_timeout, None);
        assert_eq!(params.keep_last_turns, Some(20));
    }
}
