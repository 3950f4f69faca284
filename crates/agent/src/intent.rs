//! Intent extraction: one JSON-constrained completion turns the raw query
//! into a `SearchIntent`. The model is told to extract only criteria the
//! user explicitly stated; everything else stays null.

use std::sync::Arc;

use tracing::{debug, warn};

use rolodex_core::domain::user::USER_SCHEMA_FIELDS;
use rolodex_core::{IntentError, SearchIntent};

use crate::llm::{ChatMessage, LlmClient};

pub struct IntentParser {
    llm: Arc<dyn LlmClient>,
}

impl IntentParser {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn parse(&self, query: &str) -> Result<SearchIntent, IntentError> {
        let messages = [ChatMessage::system(system_prompt()), ChatMessage::user(query)];
        let completion = self.llm.complete(&messages, true).await?;

        debug!(raw = %completion, "raw intent completion");
        let intent = decode_intent(&completion)?;
        debug!(?intent, "parsed intent");
        Ok(intent)
    }
}

fn system_prompt() -> String {
    format!(
        r#"You are a specialized database query parser with one task: extract ONLY explicitly mentioned search criteria.

Database schema: {schema}

OUTPUT REQUIREMENTS:
- Return ONLY valid JSON with these exact keys:
{{
  "name": string or null,
  "location": string or null,
  "min_age": number or null,
  "max_age": number or null,
  "fields_requested": ["field1", "field2"],
  "is_all_info": boolean
}}

STRICT RULES:
1. Include ONLY criteria explicitly stated in the query
2. For age ranges: "over 30" -> min_age=31, "under 40" -> max_age=39
3. For location, extract city, state, pincode or any location identifier
4. Set is_all_info=true only if the query asks for "all information" or "everything"
5. fields_requested should contain specific fields mentioned (name, age, etc.)
6. DO NOT add explanations or text outside the JSON
7. DO NOT infer criteria not directly mentioned
8. If a field isn't mentioned, set it to null

RESPONSE FORMAT: Valid JSON object only, no preamble or explanation."#,
        schema = USER_SCHEMA_FIELDS.join(", ")
    )
}

/// Decode a completion into an intent. Direct parse first; if the model
/// wrapped the object in prose, fall back to the first top-level `{...}`
/// span. Pure, so decoding the same completion twice is identical.
fn decode_intent(raw: &str) -> Result<SearchIntent, IntentError> {
    if let Ok(intent) = serde_json::from_str::<SearchIntent>(raw) {
        return Ok(intent);
    }

    if let Some(span) = first_object_span(raw) {
        if let Ok(intent) = serde_json::from_str::<SearchIntent>(span) {
            return Ok(intent);
        }
    }

    warn!(raw = %raw, "intent completion not recoverable as JSON");
    Err(IntentError::Malformed { raw: raw.to_string() })
}

/// First balanced top-level `{...}` span, by brace depth. Falls back to
/// the greedy first-`{` to last-`}` slice when the text is unbalanced.
fn first_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
