//! Answer synthesis: a second completion turns retrieved records into a
//! readable answer. This stage never fails upward; any internal error
//! becomes the fixed apology sentence. That is deliberate policy, not an
//! omission.

use std::sync::Arc;

use tracing::warn;

use rolodex_core::UserRecord;

use crate::llm::{ChatMessage, LlmClient};
use crate::pipeline::APOLOGY_TEXT;

/// Records resolved for a query, in retrieval order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordContext {
    None,
    Single(UserRecord),
    Many(Vec<UserRecord>),
}

pub struct ResponseSynthesizer {
    llm: Arc<dyn LlmClient>,
}

const SYNTHESIS_PROMPT: &str = r#"You are an expert database assistant presenting user information. Your goal is to transform raw data into clear, concise, and well-structured responses.

CONTEXT:
- You're working with a user database containing: id, name, age, gender, phone_no, pincode, address
- You'll receive a user query and JSON data from the database
- The user wants specific information presented in a readable format

RESPONSE GUIDELINES:
1. ANALYZE the query to understand what information is being requested
2. FOCUS on the specific data points relevant to the query
3. STRUCTURE your response with appropriate formatting:
   - Use headings for different users or data categories
   - Use bullet points for listing multiple attributes
   - Use tables for comparing multiple users (if applicable)
4. HIGHLIGHT key information that directly answers the query
5. SUMMARIZE when dealing with multiple users (e.g., "Found 5 users matching your criteria")
6. ADAPT your formatting based on the amount and type of data
7. BE CONCISE - avoid unnecessary explanations about the data structure
8. USE NATURAL LANGUAGE - transform field names into readable sentences

TONE: Professional, helpful, and direct. Prioritize clarity and readability."#;

const NO_DATA_SENTINEL: &str = "No user data found matching your query.";

impl ResponseSynthesizer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Returns the completion verbatim, or the apology sentence if the
    /// completion call failed. Callers never see an error from here.
    pub async fn synthesize(&self, query: &str, data: RecordContext) -> String {
        let context = context_block(&data);
        let messages = [
            ChatMessage::system(SYNTHESIS_PROMPT),
            ChatMessage::user(format!("Query: {query}\nUser Data:\n{context}")),
        ];

        match self.llm.complete(&messages, false).await {
            Ok(answer) => answer,
            Err(error) => {
                warn!(%error, "synthesis completion failed, returning apology");
                APOLOGY_TEXT.to_string()
            }
        }
    }
}

fn context_block(data: &RecordContext) -> String {
    match data {
        RecordContext::None => NO_DATA_SENTINEL.to_string(),
        RecordContext::Single(record) => pretty_json(record),
        RecordContext::Many(records) => {
            format!("Record count: {}\n{}", records.len(), pretty_json(records))
        }
    }
}

fn pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| NO_DATA_SENTINEL.to_string())
}
