//! Speech-to-text collaborator.
//!
//! The engine only ever sees the transcription string. A transcriber that
//! fails does not return an error: it returns a string starting with
//! [`ERROR_MARKER`] (older providers used `❌`), and comparison entry points
//! turn such a string into a report with status `error`.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Prefix of a transcription that reports a failure
pub const ERROR_MARKER: &str = "[ERROR]";

/// Legacy failure prefix, rewritten to [`ERROR_MARKER`]
pub const LEGACY_ERROR_MARKER: &str = "❌";

/// Default request timeout for the inference endpoint
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// True if `transcription` is a failure sentinel rather than recognized text
#[must_use]
pub fn is_failure(transcription: &str) -> bool {
    let trimmed = transcription.trim_start();
    trimmed.starts_with(ERROR_MARKER) || trimmed.starts_with(LEGACY_ERROR_MARKER)
}

/// The failure message with the legacy marker rewritten
#[must_use]
pub fn failure_message(transcription: &str) -> String {
    transcription.replace(LEGACY_ERROR_MARKER, ERROR_MARKER)
}

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("Request to transcriber failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Transcriber returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected transcriber response: {0}")]
    UnexpectedResponse(String),
}

/// Client for a remote inference endpoint that accepts raw audio bytes
#[derive(Debug, Clone)]
pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTranscriber {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, TranscribeError> {
        Self::with_timeout(endpoint, api_key, DEFAULT_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranscribeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Transcribe `audio`, returning an `[ERROR] ...` string on any failure
    pub async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> String {
        match self.try_transcribe(audio, content_type).await {
            Ok(text) => {
                info!(chars = text.chars().count(), "Received transcription");
                text
            }
            Err(e) => {
                warn!(error = %e, endpoint = %self.endpoint, "Transcription failed");
                format!("{ERROR_MARKER} {e}")
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails, the endpoint answers with a
    /// non-success status, or the body holds no transcription.
    pub async fn try_transcribe(
        &self,
        audio: Vec<u8>,
        content_type: &str,
    ) -> Result<String, TranscribeError> {
        debug!(bytes = audio.len(), endpoint = %self.endpoint, "Sending audio");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(audio)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TranscribeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        extract_transcription(&body)
    }
}

/// Pull the transcription out of an inference response body.
///
/// Accepted shapes: an object with `text`, `transcription` or `output`; a
/// bare JSON string; an array whose first element is one of those.
///
/// # Errors
///
/// Returns `TranscribeError::UnexpectedResponse` if no non-empty
/// transcription can be found.
pub fn extract_transcription(body: &str) -> Result<String, TranscribeError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| TranscribeError::UnexpectedResponse(e.to_string()))?;

    let text = match &value {
        Value::Array(items) => items.first().and_then(text_of),
        other => text_of(other),
    };

    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| TranscribeError::UnexpectedResponse(truncate(body, 200)))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["text", "transcription", "output"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
