//! Query orchestrator: parse -> resolve -> synthesize, strictly in that
//! order, with the fallback policy owned here. `process` is infallible at
//! the signature level; the only user-visible failure texts are
//! `APOLOGY_TEXT` and the not-found sentence.

use std::sync::Arc;

use tracing::{error, info};

use rolodex_core::{PipelineError, SearchIntent, UserRecord};
use rolodex_store::RecordStore;

use crate::intent::IntentParser;
use crate::llm::LlmClient;
use crate::synthesis::{RecordContext, ResponseSynthesizer};

/// The one generic failure sentence a user can ever see.
pub const APOLOGY_TEXT: &str =
    "I'm sorry, but I encountered an error while processing your request. Please try again later.";

pub fn not_found_message(name: &str) -> String {
    format!("I couldn't find anyone named {name} in the database.")
}

pub struct QueryPipeline {
    parser: IntentParser,
    synthesizer: ResponseSynthesizer,
    store: Arc<dyn RecordStore>,
}

enum Resolution {
    Data(RecordContext),
    NotFound(String),
}

impl QueryPipeline {
    pub fn new(llm: Arc<dyn LlmClient>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            parser: IntentParser::new(llm.clone()),
            synthesizer: ResponseSynthesizer::new(llm),
            store,
        }
    }

    /// Handle one query end to end. Stateless: nothing is remembered
    /// across calls.
    pub async fn process(&self, query: &str) -> String {
        match self.run(query).await {
            Ok(answer) => answer,
            Err(error) => {
                error!(stage = error.stage(), %error, "query pipeline stage failed");
                APOLOGY_TEXT.to_string()
            }
        }
    }

    async fn run(&self, query: &str) -> Result<String, PipelineError> {
        let intent = self.parser.parse(query).await?;

        match self.resolve(&intent).await? {
            Resolution::NotFound(name) => Ok(not_found_message(&name)),
            Resolution::Data(context) => Ok(self.synthesizer.synthesize(query, context).await),
        }
    }

    /// The default path uses only the name criterion or the all-records
    /// fallback; location and age filters are deliberately not pushed
    /// down to `search`.
    async fn resolve(&self, intent: &SearchIntent) -> Result<Resolution, PipelineError> {
        // Models sometimes emit "" instead of null; a blank name is no
        // criterion at all.
        let name = intent.name.as_deref().map(str::trim).filter(|name| !name.is_empty());
        if let Some(name) = name {
            return match self.store.get_by_name(name).await? {
                Some(record) => {
                    info!(name = %record.name, "resolved a single record by name");
                    Ok(Resolution::Data(RecordContext::Single(record)))
                }
                None => {
                    info!(%name, "no record matched the requested name");
                    Ok(Resolution::NotFound(name.to_string()))
                }
            };
        }

        let records: Vec<UserRecord> = self.store.get_all().await?;
        info!(count = records.len(), "resolved the full record set");
        Ok(Resolution::Data(RecordContext::Many(records)))
    }
}
