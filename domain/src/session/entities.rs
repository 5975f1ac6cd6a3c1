//! Session domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role, as the provider expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One exchange unit within a session (Entity)
///
/// Immutable once appended; ordering is implied by position in the
/// transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation history for one session (Entity)
///
/// The transcript is the unit of conversational memory: the orchestrator
/// replays it to the provider on every call so that stateless completions
/// appear continuous. `last_active` is bumped on every mutation and drives
/// least-recently-active eviction in the session store.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
    last_active: DateTime<Utc>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            last_active: Utc::now(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
        self.touch();
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
        self.touch();
    }

    /// The last `k` turns, oldest first. With `None`, the whole transcript.
    ///
    /// Backs the opt-in prompt truncation flag; the default is to resend
    /// everything.
    pub fn last_turns(&self, k: Option<usize>) -> &[Turn] {
        match k {
            Some(k) if k < self.turns.len() => &self.turns[self.turns.len() - k..],
            _ => &self.turns,
        }
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
