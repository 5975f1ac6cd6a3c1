//! Port definitions (interfaces)
//!
//! Ports define how the application layer communicates with the outside
//! world. Adapters implementing these traits live in the infrastructure
//! layer.

pub mod account_store;
pub mod chat_log;
pub mod credential_vault;
pub mod llm_gateway;

pub use account_store::{AccountRecord, AccountStore, AccountStoreError};
pub use chat_log::{ChatLog, ChatRecord, NoChatLog};
pub use credential_vault::{CredentialVault, VaultError};
pub use llm_gateway::{GatewayError, LlmGateway};
