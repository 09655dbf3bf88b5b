//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p docscan-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use docscan_api::constants;
use docscan_api::setup::routes;
use docscan_api::state::AppState;
use docscan_core::{Config, ParsedFile};
use docscan_services::{DocumentRecognizer, RecognitionError, RecognizedDocument};
use std::collections::HashMap;
use std::sync::Arc;

pub const TEST_API_KEY: &str = "test-api-key-0123456789abcdef01234567";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn bearer() -> String {
    format!("Bearer {}", TEST_API_KEY)
}

/// Echoes what it was given instead of calling an OCR backend.
pub struct MockRecognizer;

#[async_trait]
impl DocumentRecognizer for MockRecognizer {
    async fn recognize(&self, file: &ParsedFile) -> Result<RecognizedDocument, RecognitionError> {
        Ok(RecognizedDocument {
            text: format!("recognized {} bytes of {}", file.size(), file.mimetype()),
        })
    }
}

pub struct FailingRecognizer;

#[async_trait]
impl DocumentRecognizer for FailingRecognizer {
    async fn recognize(&self, _file: &ParsedFile) -> Result<RecognizedDocument, RecognitionError> {
        Err(RecognitionError::Upstream(
            "upstream leaked api key abc123".to_string(),
        ))
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("API_KEY".to_string(), TEST_API_KEY.to_string());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    let config = Config::from_source(|key| vars.get(key).cloned()).expect("test config");
    config.validate().expect("valid test config");
    config
}

pub fn setup_test_server(
    config: Config,
    recognizer: Option<Arc<dyn DocumentRecognizer>>,
) -> TestServer {
    let state = Arc::new(AppState::new(config.clone(), recognizer));
    let router = routes::setup_routes(&config, state).expect("router");
    TestServer::new(router).expect("test server")
}

pub fn mock_recognizer() -> Option<Arc<dyn DocumentRecognizer>> {
    let recognizer: Arc<dyn DocumentRecognizer> = Arc::new(MockRecognizer);
    Some(recognizer)
}

/// Server with default upload limits and the echoing recognizer.
pub fn setup_test_app() -> TestServer {
    setup_test_server(test_config(&[]), mock_recognizer())
}

pub fn file_form(field: &str, filename: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(field, Part::bytes(data).file_name(filename).mime_type(mime))
}

/// PNG signature followed by filler bytes.
pub fn fake_png(len: usize) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.resize(len.max(data.len()), 0xAB);
    data
}
