//! Collaborator wiring

use anyhow::{Context, Result};
use docscan_core::Config;
use docscan_services::{DocumentRecognizer, HttpRecognizer};
use std::sync::Arc;

/// Build the recognition backend, if one is configured.
pub fn setup_recognizer(config: &Config) -> Result<Option<Arc<dyn DocumentRecognizer>>> {
    let recognizer = HttpRecognizer::from_config(&config.recognition)
        .context("Failed to initialize document recognizer")?;

    match recognizer {
        Some(recognizer) => {
            tracing::info!(
                api_url = %config.recognition.api_url,
                max_file_size_mb = config.recognition.max_file_size_bytes / 1024 / 1024,
                "Document recognizer configured"
            );
            let recognizer: Arc<dyn DocumentRecognizer> = Arc::new(recognizer);
            Ok(Some(recognizer))
        }
        None => {
            tracing::warn!("OCR_API_KEY not set; scan uploads will fail until it is configured");
            Ok(None)
        }
    }
}
