//! Answer service boundary.
//!
//! The only contract with the remote side is a `{ "question": ... }` request
//! and an `{ "answer": ..., "note"?: ... }` response. [`AnswerService`] is
//! the seam the controller talks to; [`HttpAnswerService`] is the network
//! implementation.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request body sent to the answer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question exactly as the user submitted it.
    pub question: String,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Successful response from the answer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    /// The answer text.
    pub answer: String,
    /// Optional annotation shown after the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AskResponse {
    /// A response with an answer and no note.
    pub fn answer(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            note: None,
        }
    }

    /// Attach a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The note, if present and non-empty.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.is_empty())
    }
}

/// Something that can answer a question.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Send one question and wait for its answer.
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, AnswerError>;
}

/// Answer service reached over HTTP with a JSON POST.
#[derive(Debug, Clone)]
pub struct HttpAnswerService {
    client: Client,
    endpoint: String,
}

impl HttpAnswerService {
    /// Create a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AnswerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, AnswerError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, AnswerError> {
        debug!(endpoint = %self.endpoint, "posting question");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnswerError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        decode_response(&body)
    }
}

/// Wire shape accepted from the service before validation.
#[derive(Debug, Deserialize)]
struct RawResponse {
    answer: Option<String>,
    note: Option<String>,
    error: Option<String>,
}

/// Decode a response body.
///
/// A body without an `answer` is rejected; if it carries an `error` field
/// that message is kept for logging.
pub fn decode_response(body: &str) -> Result<AskResponse, AnswerError> {
    let raw: RawResponse = serde_json::from_str(body).map_err(AnswerError::Malformed)?;
    match (raw.answer, raw.error) {
        (Some(answer), _) => Ok(AskResponse {
            answer,
            note: raw.note,
        }),
        (None, Some(error)) => Err(AnswerError::Service(error)),
        (None, None) => Err(AnswerError::MissingAnswer),
    }
}

/// Ways an answer request can fail.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    /// Connection, timeout, or body read failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("Answer service returned HTTP {0}")]
    Status(u16),

    /// Body was not valid JSON of the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Body had no `answer` field.
    #[error("Response has no answer")]
    MissingAnswer,

    /// The service reported an error instead of answering.
    #[error("Answer service error: {0}")]
    Service(String),

    /// The task running the request panicked or was cancelled.
    #[error("Request task failed: {0}")]
    Task(String),
}
