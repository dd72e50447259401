//! Fire-and-forget reporting of attempts and completions.
//!
//! The player never waits on the recorder: payloads are handed to a sink and
//! failures are logged, not surfaced. [`AttemptSink`] is the seam that lets
//! tests capture payloads without a server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SinkError;

/// Per-attempt wire payload for `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPayload {
    pub session_id: String,
    pub item_id: String,
    pub item_type: String,
    /// 0 or 1 on the wire.
    pub correct: u8,
    pub response: String,
}

/// Completion marker payload for `POST /complete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletePayload {
    pub session_id: String,
}

/// Destination for telemetry emitted by the player loop.
#[async_trait]
pub trait AttemptSink: Send + Sync {
    async fn submit_attempt(&self, payload: SubmitPayload) -> Result<(), SinkError>;
    async fn submit_completion(&self, payload: CompletePayload) -> Result<(), SinkError>;
}

/// Sink that posts JSON to the recorder service.
#[derive(Debug, Clone)]
pub struct HttpAttemptSink {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAttemptSink {
    /// Point the sink at a recorder base URL such as `http://127.0.0.1:8080`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, payload: &T) -> Result<(), SinkError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(payload).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(SinkError::HttpStatus(response.status()))
        }
    }
}

#[async_trait]
impl AttemptSink for HttpAttemptSink {
    async fn submit_attempt(&self, payload: SubmitPayload) -> Result<(), SinkError> {
        self.post("/submit", &payload).await
    }

    async fn submit_completion(&self, payload: CompletePayload) -> Result<(), SinkError> {
        self.post("/complete", &payload).await
    }
}
