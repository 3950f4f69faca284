//! Query pipeline - LLM-powered intent extraction and answer synthesis
//!
//! This crate is the core of the rolodex system: the two-stage LLM
//! orchestration over the user record store.
//!
//! 1. **Intent extraction** (`intent`) - parse a free-text query into a
//!    structured `SearchIntent` via a JSON-constrained completion
//! 2. **Record resolution** - the pipeline turns the intent into record
//!    store lookups (`get_by_name` or `get_all`)
//! 3. **Answer synthesis** (`synthesis`) - a second completion turns the
//!    retrieved records into a readable answer
//!
//! # Key types
//!
//! - `QueryPipeline` - sequences the stages and owns the fallback policy
//!   (see `pipeline`)
//! - `LlmClient` - pluggable completion transport; `OpenAiCompatClient`
//!   is the wired implementation
//!
//! # Failure policy
//!
//! Exactly two sentences can reach a user on a failure path: the fixed
//! apology, and the "couldn't find `<name>`" message. Everything else is
//! logged and swallowed at the pipeline boundary. The LLM is strictly a
//! translator and a formatter; record selection is deterministic.

pub mod intent;
pub mod llm;
pub mod pipeline;
pub mod synthesis;

pub use intent::IntentParser;
pub use llm::{ChatMessage, LlmClient, OpenAiCompatClient, Role};
pub use pipeline::QueryPipeline;
pub use synthesis::{RecordContext, ResponseSynthesizer};

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use rolodex_core::LlmError;

    use crate::llm::{ChatMessage, LlmClient};

    /// Scripted completion transport: pops one queued outcome per call and
    /// records how it was invoked.
    #[derive(Default)]
    pub struct ScriptedLlm {
        outcomes: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: AtomicUsize,
        json_flags: Mutex<Vec<bool>>,
        last_user_content: Mutex<Option<String>>,
    }

    impl ScriptedLlm {
        pub fn completing(outcomes: Vec<Result<String, LlmError>>) -> Self {
            Self { outcomes: Mutex::new(outcomes.into()), ..Self::default() }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn json_flags(&self) -> Vec<bool> {
            self.json_flags.lock().expect("json flag lock").clone()
        }

        pub fn last_user_content(&self) -> Option<String> {
            self.last_user_content.lock().expect("user content lock").clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            json_only: bool,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.json_flags.lock().expect("json flag lock").push(json_only);

            let user = messages
                .iter()
                .rev()
                .find(|message| matches!(message.role, crate::llm::Role::User))
                .map(|message| message.content.clone());
            *self.last_user_content.lock().expect("user content lock") = user;

            self.outcomes
                .lock()
                .expect("outcome lock")
                .pop_front()
                .expect("scripted llm ran out of outcomes")
        }
    }
}
