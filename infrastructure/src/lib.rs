//! Infrastructure layer for parley
//!
//! This crate contains the adapters behind the application ports: the
//! AES-GCM credential vault, the Groq HTTP gateway, configuration
//! loading, the JSONL chat log, and the in-memory account store.

pub mod accounts;
pub mod config;
pub mod logging;
pub mod providers;
pub mod vault;

// Re-export commonly used types
pub use accounts::InMemoryAccountStore;
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use logging::JsonlChatLog;
pub use providers::GroqGateway;
pub use vault::AesGcmVault;
