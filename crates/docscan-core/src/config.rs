//! Configuration module
//!
//! Environment driven configuration for the API server, the upload decoder and
//! the recognition collaborator.

use std::env;

use crate::constants::{
    OCR_DEFAULT_API_URL, OCR_MAX_FILE_SIZE_MB, OCR_TIMEOUT_SECS, UPLOAD_ALLOWED_CONTENT_TYPES,
    UPLOAD_FIELD_NAMES, UPLOAD_MAX_FILE_SIZE_MB, UPLOAD_TIMEOUT_SECS,
};

const DEFAULT_PORT: u16 = 4000;
const MIN_API_KEY_LENGTH: usize = 32;
const BYTES_PER_MB: usize = 1024 * 1024;
const MAX_UPLOAD_FILE_SIZE_MB: usize = 1024;
const MAX_TIMEOUT_SECS: u64 = 3600;

/// Limits applied while decoding an upload
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_file_size_bytes: usize,
    pub timeout_secs: u64,
    pub allowed_content_types: Vec<String>,
    pub field_names: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: UPLOAD_MAX_FILE_SIZE_MB * BYTES_PER_MB,
            timeout_secs: UPLOAD_TIMEOUT_SECS,
            allowed_content_types: UPLOAD_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            field_names: UPLOAD_FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Document recognition (OCR) collaborator settings
#[derive(Clone, Debug)]
pub struct RecognitionConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub max_file_size_bytes: usize,
    pub timeout_secs: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            api_url: OCR_DEFAULT_API_URL.to_string(),
            api_key: None,
            max_file_size_bytes: OCR_MAX_FILE_SIZE_MB * BYTES_PER_MB,
            timeout_secs: OCR_TIMEOUT_SECS,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub api_key: String,
    pub service_name: String,
    pub upload: UploadConfig,
    pub recognition: RecognitionConfig,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = lookup("PORT")
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let api_key = lookup("API_KEY")
            .ok_or_else(|| anyhow::anyhow!("API_KEY must be set for authentication"))?;

        let defaults = UploadConfig::default();
        let upload = UploadConfig {
            max_file_size_bytes: megabytes(
                "UPLOAD_MAX_FILE_SIZE_MB",
                lookup("UPLOAD_MAX_FILE_SIZE_MB"),
                defaults.max_file_size_bytes,
            )?,
            timeout_secs: lookup("UPLOAD_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            allowed_content_types: lookup("UPLOAD_ALLOWED_CONTENT_TYPES")
                .map(|s| split_list(&s, true))
                .unwrap_or(defaults.allowed_content_types),
            // Field names are matched case-sensitively, so they are not lowercased.
            field_names: lookup("UPLOAD_FIELD_NAMES")
                .map(|s| split_list(&s, false))
                .unwrap_or(defaults.field_names),
        };

        let defaults = RecognitionConfig::default();
        let recognition = RecognitionConfig {
            api_url: lookup("OCR_API_URL").unwrap_or(defaults.api_url),
            api_key: lookup("OCR_API_KEY").filter(|s| !s.trim().is_empty()),
            max_file_size_bytes: megabytes(
                "OCR_MAX_FILE_SIZE_MB",
                lookup("OCR_MAX_FILE_SIZE_MB"),
                defaults.max_file_size_bytes,
            )?,
            timeout_secs: lookup("OCR_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        };

        Ok(Config {
            server_port,
            environment,
            cors_origins,
            api_key,
            service_name: lookup("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| "docscan-api".to_string()),
            upload,
            recognition,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_key.len() < MIN_API_KEY_LENGTH {
            return Err(anyhow::anyhow!(
                "API_KEY must be at least {} characters long",
                MIN_API_KEY_LENGTH
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.upload.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.upload.max_file_size_bytes > MAX_UPLOAD_FILE_SIZE_MB * BYTES_PER_MB {
            return Err(anyhow::anyhow!(
                "UPLOAD_MAX_FILE_SIZE_MB must not exceed {}",
                MAX_UPLOAD_FILE_SIZE_MB
            ));
        }

        if self.upload.timeout_secs == 0 || self.upload.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(anyhow::anyhow!(
                "UPLOAD_TIMEOUT_SECS must be between 1 and {}",
                MAX_TIMEOUT_SECS
            ));
        }

        if self.recognition.timeout_secs == 0 || self.recognition.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(anyhow::anyhow!(
                "OCR_TIMEOUT_SECS must be between 1 and {}",
                MAX_TIMEOUT_SECS
            ));
        }

        if self.upload.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "UPLOAD_ALLOWED_CONTENT_TYPES must list at least one type"
            ));
        }

        if self.upload.field_names.is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_FIELD_NAMES must list at least one name"));
        }

        Ok(())
    }
}

/// Megabyte setting as bytes. Unparseable values fall back to `default`.
fn megabytes(key: &str, raw: Option<String>, default: usize) -> Result<usize, anyhow::Error> {
    match raw.and_then(|s| s.trim().parse::<usize>().ok()) {
        Some(mb) => mb
            .checked_mul(BYTES_PER_MB)
            .ok_or_else(|| anyhow::anyhow!("{} is too large", key)),
        None => Ok(default),
    }
}

fn split_list(raw: &str, lowercase: bool) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if lowercase {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        })
        .collect()
}
