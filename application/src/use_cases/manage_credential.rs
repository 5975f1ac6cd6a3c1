//! Credential management use case.
//!
//! Saving, inspecting, and removing a user's provider credential and model
//! preference. Unlike the completion path, these are explicit user actions
//! and fail loudly: a credential that the provider rejects is never
//! persisted, and the caller gets the structured reason.

use crate::ports::account_store::{AccountRecord, AccountStore, AccountStoreError};
use crate::ports::credential_vault::{CredentialVault, VaultError};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use parley_domain::ModelId;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Outcome of probing a credential against the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub reason: Option<String>,
}

impl Validation {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Confirms a plaintext credential is accepted by the provider before it
/// is persisted, via the cheap model-listing endpoint under a bounded
/// timeout.
pub struct CredentialValidator {
    gateway: Arc<dyn LlmGateway>,
    probe_timeout: Duration,
}

impl CredentialValidator {
    pub fn new(gateway: Arc<dyn LlmGateway>, probe_timeout: Duration) -> Self {
        Self {
            gateway,
            probe_timeout,
        }
    }

    /// Probe the provider with the candidate credential.
    ///
    /// Never panics and never echoes the credential; failures map to the
    /// stable reasons the caller can show verbatim.
    pub async fn validate(&self, plaintext: &str) -> Validation {
        let probe = self.gateway.list_models(plaintext);
        let result = match tokio::time::timeout(self.probe_timeout, probe).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout),
        };

        match result {
            Ok(_) => Validation::ok(),
            Err(GatewayError::Unauthorized) => Validation::rejected("invalid credential"),
            Err(GatewayError::RateLimited) => Validation::rejected("provider error: rate limited"),
            Err(GatewayError::Provider(status)) => {
                Validation::rejected(format!("provider error: {}", status))
            }
            Err(GatewayError::Network(detail)) => {
                Validation::rejected(format!("connection error: {}", detail))
            }
            Err(GatewayError::Timeout) => {
                Validation::rejected("connection error: request timed out")
            }
        }
    }
}

/// Errors that can occur while managing a credential
#[derive(Error, Debug)]
pub enum ManageCredentialError {
    /// The provider rejected the candidate credential; nothing was stored.
    #[error("credential validation failed: {0}")]
    ValidationFailed(String),

    /// The user has no stored credential configuration to operate on.
    #[error("no API key configured")]
    NoCredential,

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Store(#[from] AccountStoreError),
}

/// What a caller may see about a stored credential: presence, the masked
/// preview, and the model preference. Never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStatus {
    pub has_key: bool,
    pub key_preview: Option<String>,
    pub selected_model: ModelId,
}

impl CredentialStatus {
    fn absent() -> Self {
        Self {
            has_key: false,
            key_preview: None,
            selected_model: ModelId::default(),
        }
    }
}

/// Use case for the credential lifecycle: save, inspect, remove, and
/// model-preference updates.
pub struct ManageCredentialUseCase {
    vault: Arc<dyn CredentialVault>,
    accounts: Arc<dyn AccountStore>,
    validator: CredentialValidator,
}

impl ManageCredentialUseCase {
    pub fn new(
        vault: Arc<dyn CredentialVault>,
        accounts: Arc<dyn AccountStore>,
        validator: CredentialValidator,
    ) -> Self {
        Self {
            vault,
            accounts,
            validator,
        }
    }

    /// Validate, encrypt, and store a credential.
    ///
    /// Validation runs synchronously before anything is written; a
    /// rejected credential is never persisted. An existing model
    /// preference survives unless the caller supplies a new one.
    pub async fn save(
        &self,
        user_id: &str,
        plaintext_key: &str,
        selected_model: Option<ModelId>,
    ) -> Result<CredentialStatus, ManageCredentialError> {
        let validation = self.validator.validate(plaintext_key).await;
        if !validation.valid {
            let reason = validation
                .reason
                .unwrap_or_else(|| "unknown".to_string());
            debug!(user_id, "rejected credential: {}", reason);
            return Err(ManageCredentialError::ValidationFailed(reason));
        }

        let encrypted = self.vault.encrypt(plaintext_key)?;

        let model = match selected_model {
            Some(model) => Some(model),
            None => self
                .accounts
                .get(user_id)
                .await?
                .and_then(|record| record.selected_model),
        };

        let record = AccountRecord::new(Some(encrypted), model);
        self.accounts.upsert(user_id, record).await?;
        info!(user_id, "credential saved");

        self.status(user_id).await
    }

    /// What the user currently has configured.
    pub async fn status(&self, user_id: &str) -> Result<CredentialStatus, ManageCredentialError> {
        let Some(record) = self.accounts.get(user_id).await? else {
            return Ok(CredentialStatus::absent());
        };

        let key_preview = record.encrypted_key.as_deref().map(|blob| self.vault.preview(blob));
        Ok(CredentialStatus {
            has_key: record.has_key(),
            key_preview,
            selected_model: record.selected_model.unwrap_or_default(),
        })
    }

    /// Remove the stored credential configuration entirely.
    pub async fn remove(&self, user_id: &str) -> Result<bool, ManageCredentialError> {
        let removed = self.accounts.delete(user_id).await?;
        if removed {
            info!(user_id, "credential removed");
        }
        Ok(removed)
    }

    /// Update only the model preference.
    ///
    /// Requires an existing record; selecting a model before ever saving a
    /// key is rejected, so callers are pushed to [`save`](Self::save)
    /// first.
    pub async fn select_model(
        &self,
        user_id: &str,
        model: ModelId,
    ) -> Result<(), ManageCredentialError> {
        let Some(record) = self.accounts.get(user_id).await? else {
            return Err(ManageCredentialError::NoCredential);
        };

        let updated = AccountRecord::new(record.encrypted_key, Some(model));
        self.accounts.upsert(user_id, updated).await?;
        Ok(())
    }
}
