//! Application layer for parley
//!
//! This crate contains use cases, port definitions, the shared session
//! store, and application configuration. It depends only on the domain
//! layer.

pub mod config;
pub mod ports;
pub mod session_store;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatParams, DEFAULT_SYSTEM_PROMPT};
pub use ports::{
    account_store::{AccountRecord, AccountStore, AccountStoreError},
    chat_log::{ChatLog, ChatRecord, NoChatLog},
    credential_vault::{CredentialVault, VaultError},
    llm_gateway::{GatewayError, LlmGateway},
};
pub use session_store::{SessionStore, SharedTranscript};
pub use use_cases::{
    ConverseInput, ConverseOutcome, ConverseUseCase, CredentialStatus, CredentialValidator,
    ListModelsError, ListModelsUseCase, ManageCredentialError, ManageCredentialUseCase,
    ModelListing, SoftFailureKind, Validation,
};
