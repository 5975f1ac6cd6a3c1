//! List models use case.
//!
//! Fetches the provider's model listing with the user's own credential and
//! applies the catalog policy (open-weight chat families in, audio models
//! out, sorted by id). A missing credential is a real error, since listing
//! is an explicit user action, but a provider failure degrades to an empty
//! listing so the UI can render "no models available" instead of breaking.

use crate::ports::account_store::{AccountStore, AccountStoreError};
use crate::ports::credential_vault::CredentialVault;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use parley_domain::{CatalogPolicy, ModelId, ModelInfo};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while listing models
#[derive(Error, Debug)]
pub enum ListModelsError {
    /// The user has no stored credential; listing requires their own key.
    #[error("no API key configured")]
    NoCredential,

    /// The stored credential could not be decrypted.
    #[error("credential unreadable, please re-enter")]
    CredentialUnreadable,

    #[error(transparent)]
    Store(#[from] AccountStoreError),
}

/// Filtered model listing plus the user's current preference.
#[derive(Debug, Clone)]
pub struct ModelListing {
    pub models: Vec<ModelInfo>,
    pub selected_model: ModelId,
}

/// Use case for fetching the filtered model catalog.
pub struct ListModelsUseCase {
    gateway: Arc<dyn LlmGateway>,
    vault: Arc<dyn CredentialVault>,
    accounts: Arc<dyn AccountStore>,
    policy: CatalogPolicy,
    probe_timeout: Duration,
}

impl ListModelsUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        vault: Arc<dyn CredentialVault>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            gateway,
            vault,
            accounts,
            policy: CatalogPolicy::default(),
            probe_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_policy(mut self, policy: CatalogPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// List the models available to `user_id`'s stored credential.
    pub async fn list(&self, user_id: &str) -> Result<ModelListing, ListModelsError> {
        let record = self
            .accounts
            .get(user_id)
            .await?
            .ok_or(ListModelsError::NoCredential)?;

        let Some(blob) = record.encrypted_key.as_deref() else {
            return Err(ListModelsError::NoCredential);
        };
        let api_key = self
            .vault
            .decrypt(blob)
            .map_err(|_| ListModelsError::CredentialUnreadable)?;

        let fetch = self.gateway.list_models(&api_key);
        let raw = match tokio::time::timeout(self.probe_timeout, fetch).await {
            Ok(Ok(models)) => models,
            Ok(Err(e)) => {
                warn!(user_id, "model listing failed: {}", e);
                Vec::new()
            }
            Err(_) => {
                warn!(user_id, "model listing failed: {}", GatewayError::Timeout);
                Vec::new()
            }
        };

        let models = self.policy.apply(raw);
        debug!(user_id, count = models.len(), "model listing");

        Ok(ModelListing {
            models,
            selected_model: record.selected_model.unwrap_or_default(),
        })
    }
}
