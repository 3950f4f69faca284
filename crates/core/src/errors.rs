use thiserror::Error;

/// Failures talking to the external record store.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record store transport failure: {0}")]
    Transport(String),
    #[error("record store rejected the query ({code}): {detail}")]
    Status { code: u16, detail: String },
    #[error("record store response could not be decoded: {0}")]
    Decode(String),
}

/// Failures talking to the LLM completion endpoint. Timeouts surface as
/// `Transport`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("llm transport failure: {0}")]
    Transport(String),
    #[error("llm endpoint returned status {code}: {detail}")]
    Status { code: u16, detail: String },
    #[error("llm response could not be decoded: {0}")]
    Decode(String),
    #[error("llm returned an empty completion")]
    EmptyCompletion,
}

/// Intent extraction failures. `Malformed` is raised only after the
/// brace-span fallback has also failed to recover a JSON object.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("could not extract a valid JSON intent from llm output")]
    Malformed { raw: String },
}

/// Internal pipeline error. Never crosses `process`: the orchestrator maps
/// every variant to the fixed apology sentence before returning.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Intent(#[from] IntentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// Stage label used in diagnostics. User-facing text never includes it.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Intent(_) => "parse",
            Self::Store(_) => "resolve",
        }
    }
}
