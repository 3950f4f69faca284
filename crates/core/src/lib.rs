pub mod config;
pub mod domain;
pub mod errors;

pub use domain::chat::{ChatRequest, ChatResponse};
pub use domain::intent::SearchIntent;
pub use domain::user::UserRecord;
pub use errors::{IntentError, LlmError, PipelineError, StoreError};
