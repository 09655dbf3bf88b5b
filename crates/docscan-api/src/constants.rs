//! API constants

/// API version segment used in every versioned route.
pub const API_VERSION: &str = "v0";

/// Versioned route prefix.
pub const API_PREFIX: &str = "/api/v0";

/// Message returned when a well-formed upload carries no file field.
pub const MISSING_FILE_MESSAGE: &str = "missing file";
