//! Application state shared by all handlers.

use docscan_core::Config;
use docscan_processing::UploadLimits;
use docscan_services::DocumentRecognizer;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub upload_limits: UploadLimits,
    /// `None` when no recognition backend is configured.
    pub recognizer: Option<Arc<dyn DocumentRecognizer>>,
}

impl AppState {
    pub fn new(config: Config, recognizer: Option<Arc<dyn DocumentRecognizer>>) -> Self {
        let upload_limits = UploadLimits::from(&config.upload);
        Self {
            config,
            upload_limits,
            recognizer,
        }
    }
}
