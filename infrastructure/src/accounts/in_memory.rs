//! In-memory account store.
//!
//! Implements the [`AccountStore`] port with a process-local map. The
//! durable store behind the real application is an external collaborator;
//! this adapter serves the CLI and tests, where credential records only
//! need to live as long as the process.

use async_trait::async_trait;
use parley_application::ports::account_store::{AccountRecord, AccountStore, AccountStoreError};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local [`AccountStore`].
#[derive(Default)]
pub struct InMemoryAccountStore {
    records: RwLock<HashMap<String, AccountRecord>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get(&self, user_id: &str) -> Result<Option<AccountRecord>, AccountStoreError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn upsert(&self, user_id: &str, record: AccountRecord) -> Result<(), AccountStoreError> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), record);
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, AccountStoreError> {
        Ok(self.records.write().await.remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::ModelId;

    #[tokio::test]
    async fn upsert_get_delete_round_trip() {
        let store = InMemoryAccountStore::new();
        assert!(store.get("u1").await.unwrap().is_none());

        store
            .upsert(
                "u1",
                AccountRecord::new(Some("blob".into()), Some(ModelId::new("gemma2-9b-it"))),
            )
            .await
            .unwrap();

        let record = store.get("u1").await.unwrap().unwrap();
        assert_eq!(record.encrypted_key.as_deref(), Some("blob"));
        assert_eq!(record.selected_model, Some(ModelId::new("gemma2-9b-it")));

        assert!(store.delete("u1").await.unwrap());
        assert!(!store.delete("u1").await.unwrap());
        assert!(store.get("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_existing_record() {
        let store = InMemoryAccountStore::new();
        store
            .upsert("u1", AccountRecord::new(Some("old".into()), None))
            .await
            .unwrap();
        store
            .upsert("u1", AccountRecord::new(Some("new".into()), None))
            .await
            .unwrap();

        let record = store.get("u1").await.unwrap().unwrap();
        assert_eq!(record.encrypted_key.as_deref(), Some("new"));
    }
}
