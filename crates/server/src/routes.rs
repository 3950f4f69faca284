//! Chat boundary: a single JSON endpoint in front of the query pipeline.
//!
//! - `POST /chat` — body `{"query": string}`, response
//!   `{"response": string, "error": string|null}`
//!
//! The pipeline converts every internal failure to user-safe text, so a
//! well-formed request always gets a 200 with `error: null`. A body that
//! cannot be decoded is the one boundary-level failure: it gets a 500
//! with the apology and the decode detail in `error`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use rolodex_agent::pipeline::APOLOGY_TEXT;
use rolodex_agent::QueryPipeline;
use rolodex_core::{ChatRequest, ChatResponse};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatState {
    pipeline: Arc<QueryPipeline>,
}

pub fn router(pipeline: Arc<QueryPipeline>) -> Router {
    Router::new().route("/chat", post(chat)).with_state(ChatState { pipeline })
}

pub async fn chat(
    State(state): State<ChatState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let correlation_id = Uuid::new_v4();

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(
                event_name = "chat.request.rejected",
                %correlation_id,
                detail = %rejection.body_text(),
                "chat request body could not be decoded"
            );
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse::failed(APOLOGY_TEXT, rejection.body_text())),
            );
        }
    };

    info!(
        event_name = "chat.request.received",
        %correlation_id,
        query_chars = request.query.len(),
        "processing chat request"
    );

    let response_text = state.pipeline.process(&request.query).await;

    info!(
        event_name = "chat.request.completed",
        %correlation_id,
        response_chars = response_text.len(),
        "chat request completed"
    );
    (StatusCode::OK, Json(ChatResponse::ok(response_text)))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    use rolodex_agent::{ChatMessage, LlmClient, QueryPipeline};
    use rolodex_core::{LlmError, UserRecord};
    use rolodex_store::InMemoryRecordStore;

    use crate::routes::router;

    struct QueuedLlm {
        completions: Mutex<VecDeque<String>>,
    }

    impl QueuedLlm {
        fn new(completions: Vec<&str>) -> Self {
            Self {
                completions: Mutex::new(
                    completions.into_iter().map(str::to_string).collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl LlmClient for QueuedLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _json_only: bool,
        ) -> Result<String, LlmError> {
            self.completions
                .lock()
                .expect("completion lock")
                .pop_front()
                .ok_or(LlmError::EmptyCompletion)
        }
    }

    fn seeded_store() -> Arc<InMemoryRecordStore> {
        Arc::new(InMemoryRecordStore::seeded(vec![UserRecord {
            id: 1,
            name: "John Smith".to_string(),
            age: 42,
            gender: "male".to_string(),
            phone_no: "9876500001".to_string(),
            pincode: "400001".to_string(),
            address: "4 Marine Drive".to_string(),
        }]))
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[tokio::test]
    async fn chat_returns_synthesized_text_with_null_error() {
        let llm = Arc::new(QueuedLlm::new(vec![
            r#"{"name": "John Smith"}"#,
            "John Smith is 42 and lives on Marine Drive.",
        ]));
        let pipeline = Arc::new(QueryPipeline::new(llm, seeded_store()));

        let response = router(pipeline)
            .oneshot(chat_request(r#"{"query": "Tell me about John Smith"}"#))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = response_json(response).await;
        let answer = payload["response"].as_str().expect("response text");
        assert!(!answer.is_empty());
        assert!(!answer.contains('{'), "answer should be prose, not raw JSON");
        assert!(payload["error"].is_null());
    }

    #[tokio::test]
    async fn chat_tolerates_an_empty_body_object() {
        let llm = Arc::new(QueuedLlm::new(vec!["{}", "Here is everyone."]));
        let pipeline = Arc::new(QueryPipeline::new(llm, seeded_store()));

        let response = router(pipeline)
            .oneshot(chat_request("{}"))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = response_json(response).await;
        assert_eq!(payload["response"], "Here is everyone.");
    }

    #[tokio::test]
    async fn undecodable_body_gets_non_2xx_with_error_populated() {
        let llm = Arc::new(QueuedLlm::new(vec![]));
        let pipeline = Arc::new(QueryPipeline::new(llm, seeded_store()));

        let response = router(pipeline)
            .oneshot(chat_request(r#"{"query": 42"#))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = response_json(response).await;
        let answer = payload["response"].as_str().expect("response text");
        assert!(answer.starts_with("I'm sorry"));
        assert!(payload["error"].as_str().is_some(), "error must carry the decode detail");
    }

    #[tokio::test]
    async fn chat_hides_internal_failures_behind_the_apology() {
        let llm = Arc::new(QueuedLlm::new(vec![]));
        let pipeline = Arc::new(QueryPipeline::new(llm, seeded_store()));

        let response = router(pipeline)
            .oneshot(chat_request(r#"{"query": "anything"}"#))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = response_json(response).await;
        let answer = payload["response"].as_str().expect("response text");
        assert!(answer.starts_with("I'm sorry"));
        assert!(payload["error"].is_null());
    }
}
