//! Account store port
//!
//! External repository holding each user's encrypted credential and model
//! preference. Durable persistence is the adapter's concern; the core only
//! reads and writes records in flight.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parley_domain::ModelId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by account store adapters
#[derive(Error, Debug)]
pub enum AccountStoreError {
    #[error("account store error: {0}")]
    Storage(String),
}

/// One user's stored credential configuration.
///
/// `encrypted_key` is a vault blob, never plaintext. The two fields are
/// independent: a user may select a model before supplying a key, or hold
/// a key while keeping the baseline model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub encrypted_key: Option<String>,
    pub selected_model: Option<ModelId>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    pub fn new(encrypted_key: Option<String>, selected_model: Option<ModelId>) -> Self {
        Self {
            encrypted_key,
            selected_model,
            updated_at: Utc::now(),
        }
    }

    pub fn has_key(&self) -> bool {
        self.encrypted_key.is_some()
    }
}

/// Repository for per-user credential and preference records
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch a user's record, `None` when the user has never saved one.
    async fn get(&self, user_id: &str) -> Result<Option<AccountRecord>, AccountStoreError>;

    /// Create or replace a user's record.
    async fn upsert(&self, user_id: &str, record: AccountRecord) -> Result<(), AccountStoreError>;

    /// Delete a user's record. Returns whether one existed.
    async fn delete(&self, user_id: &str) -> Result<bool, AccountStoreError>;
}
