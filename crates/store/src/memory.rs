use async_trait::async_trait;
use tokio::sync::RwLock;

use rolodex_core::{StoreError, UserRecord};

use crate::client::RecordStore;

/// In-memory record store for tests and offline runs. Preserves insertion
/// order, matching the ordered-sequence contract of the trait.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<UserRecord>>,
}

impl InMemoryRecordStore {
    pub fn seeded(records: Vec<UserRecord>) -> Self {
        Self { records: RwLock::new(records) }
    }

    pub async fn insert(&self, record: UserRecord) {
        self.records.write().await.push(record);
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_by_name(&self, name: &str) -> Result<Option<UserRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.name == name).cloned())
    }

    async fn get_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn search(&self, filters: &[(String, String)]) -> Result<Vec<UserRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| filters.iter().all(|(field, value)| field_matches(record, field, value)))
            .cloned()
            .collect())
    }
}

fn field_matches(record: &UserRecord, field: &str, value: &str) -> bool {
    match field {
        "id" => record.id.to_string() == value,
        "name" => record.name == value,
        "age" => record.age.to_string() == value,
        "gender" => record.gender == value,
        "phone_no" => record.phone_no == value,
        "pincode" => record.pincode == value,
        "address" => record.address == value,
        _ => false,
    }
}

/// Test double whose every call fails at the transport layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingRecordStore;

impl FailingRecordStore {
    fn error() -> StoreError {
        StoreError::Transport("injected record store failure".to_string())
    }
}

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn get_by_name(&self, _name: &str) -> Result<Option<UserRecord>, StoreError> {
        Err(Self::error())
    }

    async fn get_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Err(Self::error())
    }

    async fn search(&self, _filters: &[(String, String)]) -> Result<Vec<UserRecord>, StoreError> {
        Err(Self::error())
    }
}
