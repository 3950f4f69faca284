use std::sync::Arc;

use rolodex_agent::{OpenAiCompatClient, QueryPipeline};
use rolodex_core::config::{AppConfig, ConfigError};
use rolodex_core::{LlmError, StoreError};
use rolodex_store::{RecordStore, RestRecordStore};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub pipeline: Arc<QueryPipeline>,
    pub store: Arc<dyn RecordStore>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("record store client construction failed: {0}")]
    Store(#[source] StoreError),
    #[error("llm client construction failed: {0}")]
    Llm(#[source] LlmError),
}

/// Build the whole object graph from an already-validated config. One LLM
/// client and one store client are constructed here and injected
/// everywhere; nothing reads ambient state afterwards.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let store: Arc<dyn RecordStore> =
        Arc::new(RestRecordStore::new(&config.store).map_err(BootstrapError::Store)?);
    info!(
        event_name = "system.bootstrap.store_client_ready",
        table = %config.store.table,
        "record store client constructed"
    );

    let llm = Arc::new(OpenAiCompatClient::new(&config.llm).map_err(BootstrapError::Llm)?);
    info!(
        event_name = "system.bootstrap.llm_client_ready",
        model = %config.llm.model,
        "llm client constructed"
    );

    let pipeline = Arc::new(QueryPipeline::new(llm, store.clone()));

    Ok(Application { config, pipeline, store })
}
