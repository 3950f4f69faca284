//! Record store client: pure translation of lookup calls into
//! PostgREST-style equality queries. No business logic lives here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::debug;

use rolodex_core::config::StoreConfig;
use rolodex_core::{StoreError, UserRecord};

/// Query-by-equality interface over the external user record store.
///
/// `get_by_name` yielding no row is a soft condition (`Ok(None)`), not an
/// error; hard failures are transport/auth/decode problems only.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_by_name(&self, name: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn get_all(&self) -> Result<Vec<UserRecord>, StoreError>;
    /// Exact-match AND semantics across all supplied field/value pairs.
    async fn search(&self, filters: &[(String, String)]) -> Result<Vec<UserRecord>, StoreError>;
}

/// HTTP client for a PostgREST-compatible record store endpoint.
pub struct RestRecordStore {
    client: Client,
    base_url: String,
    table: String,
    api_key: String,
}

impl RestRecordStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            api_key: config.api_key.expose_secret().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn fetch(&self, query: &[(String, String)]) -> Result<Vec<UserRecord>, StoreError> {
        let response = self
            .client
            .get(self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { code: status.as_u16(), detail });
        }

        let records = response
            .json::<Vec<UserRecord>>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;

        debug!(count = records.len(), "record store query returned");
        Ok(records)
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn get_by_name(&self, name: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = equality_query(&[("name".to_string(), name.to_string())]);
        let records = self.fetch(&query).await?;
        Ok(records.into_iter().next())
    }

    async fn get_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let query = equality_query(&[]);
        self.fetch(&query).await
    }

    async fn search(&self, filters: &[(String, String)]) -> Result<Vec<UserRecord>, StoreError> {
        let query = equality_query(filters);
        self.fetch(&query).await
    }
}

/// PostgREST query string pairs: always `select=*`, plus one
/// `field=eq.value` pair per filter.
fn equality_query(filters: &[(String, String)]) -> Vec<(String, String)> {
    let mut query = vec![("select".to_string(), "*".to_string())];
    for (field, value) in filters {
        query.push((field.clone(), format!("eq.{value}")));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::equality_query;

    #[test]
    fn bare_query_selects_all_columns() {
        assert_eq!(equality_query(&[]), vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn filters_become_eq_operators_in_order() {
        let query = equality_query(&[
            ("name".to_string(), "Asha Rao".to_string()),
            ("pincode".to_string(), "560001".to_string()),
        ]);

        assert_eq!(query.len(), 3);
        assert_eq!(query[1], ("name".to_string(), "eq.Asha Rao".to_string()));
        assert_eq!(query[2], ("pincode".to_string(), "eq.560001".to_string()));
    }
}
