use std::time::Duration;

use docscan_core::UploadConfig;

/// Per-decode limits, resolved from [`UploadConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    /// Maximum accepted part size in bytes, inclusive.
    pub max_file_size: usize,
    pub timeout: Duration,
    /// Lowercased media type essences.
    pub allowed_content_types: Vec<String>,
    /// Exact, case-sensitive part names.
    pub field_names: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::from(&UploadConfig::default())
    }
}

impl From<&UploadConfig> for UploadLimits {
    fn from(config: &UploadConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            timeout: Duration::from_secs(config.timeout_secs),
            allowed_content_types: config
                .allowed_content_types
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            field_names: config.field_names.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_ten_mib_and_fifteen_seconds() {
        let limits = UploadLimits::default();
        assert_eq!(limits.max_file_size, 10 * 1024 * 1024);
        assert_eq!(limits.timeout, Duration::from_secs(15));
        assert_eq!(limits.field_names, vec!["file", "image"]);
    }
}
