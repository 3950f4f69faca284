use serde::{Deserialize, Serialize};

/// Body of `POST /chat`. The query text may be empty; the pipeline passes
/// it through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
}

/// Body of the `/chat` response. `error` is always present on the wire,
/// explicit `null` on the success path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn ok(response: impl Into<String>) -> Self {
        Self { response: response.into(), error: None }
    }

    pub fn failed(response: impl Into<String>, error: impl Into<String>) -> Self {
        Self { response: response.into(), error: Some(error.into()) }
    }
}
