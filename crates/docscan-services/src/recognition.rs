//! Document recognition (OCR) collaborator.
//!
//! Consumes a decoded upload and returns the recognised text. The recogniser
//! enforces its own size cap, stricter than the upload cap.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use docscan_core::{AppError, ParsedFile, RecognitionConfig};
use serde::{Deserialize, Serialize};

const DEFAULT_LANGUAGE: &str = "eng";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognizedDocument {
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("file of {size} bytes exceeds recognition limit of {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("recognition service failed: {0}")]
    Upstream(String),
}

impl From<RecognitionError> for AppError {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::FileTooLarge { max, .. } => AppError::PayloadTooLarge(format!(
                "File exceeds maximum recognizable size of {} MB",
                max / (1024 * 1024)
            )),
            RecognitionError::Upstream(msg) => AppError::Recognition(msg),
        }
    }
}

#[async_trait]
pub trait DocumentRecognizer: Send + Sync {
    async fn recognize(&self, file: &ParsedFile) -> Result<RecognizedDocument, RecognitionError>;
}

/// OCR over HTTP, speaking the OCR.space `parse/image` protocol.
pub struct HttpRecognizer {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    max_file_size: usize,
}

impl Debug for HttpRecognizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpRecognizer")
            .field("api_url", &self.api_url)
            .field("api_key", &"***")
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ParseRequest<'a> {
    #[serde(rename = "base64Image")]
    base64_image: String,
    language: &'a str,
    #[serde(rename = "isOverlayRequired")]
    is_overlay_required: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParseResponse {
    #[serde(default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(default)]
    is_errored_on_processing: bool,
    /// A string or a list of strings, depending on the failure.
    #[serde(default)]
    error_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

impl HttpRecognizer {
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &RecognitionConfig) -> anyhow::Result<Option<Self>> {
        match config.api_key.as_deref() {
            Some(key) => Self::new(config, key).map(Some),
            None => Ok(None),
        }
    }

    pub fn new(config: &RecognitionConfig, api_key: &str) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client for document recognition")?;

        Ok(Self {
            http_client,
            api_url: config.api_url.clone(),
            api_key: api_key.to_string(),
            max_file_size: config.max_file_size_bytes,
        })
    }

    fn check_size(&self, file: &ParsedFile) -> Result<(), RecognitionError> {
        if file.size() > self.max_file_size {
            return Err(RecognitionError::FileTooLarge {
                size: file.size(),
                max: self.max_file_size,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentRecognizer for HttpRecognizer {
    #[tracing::instrument(skip(self, file), fields(filename = %file.filename(), size = file.size()))]
    async fn recognize(&self, file: &ParsedFile) -> Result<RecognizedDocument, RecognitionError> {
        self.check_size(file)?;

        let request = ParseRequest {
            base64_image: data_uri(file),
            language: DEFAULT_LANGUAGE,
            is_overlay_required: false,
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .header("apikey", &self.api_key)
            .form(&request)
            .send()
            .await
            .map_err(|e| RecognitionError::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecognitionError::Upstream(format!(
                "{} - {}",
                status, error_text
            )));
        }

        let parsed: ParseResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Upstream(format!("invalid response body: {}", e)))?;

        let document = into_document(parsed)?;
        tracing::debug!(text_len = document.text.len(), "Document recognized");
        Ok(document)
    }
}

fn data_uri(file: &ParsedFile) -> String {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(file.buffer());
    format!("data:{};base64,{}", file.mimetype(), encoded)
}

fn into_document(response: ParseResponse) -> Result<RecognizedDocument, RecognitionError> {
    if response.is_errored_on_processing {
        let message = match response.error_message {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            _ => "processing failed".to_string(),
        };
        return Err(RecognitionError::Upstream(message));
    }

    let text = response
        .parsed_results
        .into_iter()
        .map(|r| r.parsed_text)
        .next()
        .ok_or_else(|| RecognitionError::Upstream("no parsed results".to_string()))?;

    Ok(RecognizedDocument { text })
}
