//! Custom error types for rustdblp.
//!
//! This module defines all error types used throughout the crate.
//! All functions return `Result<T, DblpError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for rustdblp operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum DblpError {
    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream returned a non-2xx status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: i32,
        /// Error message
        message: String,
    },

    /// Expected structure absent while parsing HTML or JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Detail page fetched fine but has no bibtex section container
    #[error("No bibtex section found on detail page")]
    BibtexSectionMissing,

    /// Bibtex section exists but contains no pre-formatted block
    #[error("Bibtex section has no pre-formatted block")]
    BibtexBlockMissing,

    /// Abstract lookup service returned an unusable response
    #[error("Abstract lookup failed: {0}")]
    AbstractService(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `DblpError`
pub type Result<T> = std::result::Result<T, DblpError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| DblpError::Parse(msg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bibtex_errors_are_distinguishable() {
        let section = DblpError::BibtexSectionMissing.to_string();
        let block = DblpError::BibtexBlockMissing.to_string();
        let transport = DblpError::Api {
            code: 503,
            message: "HTTP error: 503".to_string(),
        }
        .to_string();
        assert_ne!(section, block);
        assert_ne!(section, transport);
        assert_ne!(block, transport);
    }

    #[test]
    fn test_ok_or_parse() {
        let none: Option<u32> = None;
        let err = none.ok_or_parse("missing value").expect_err("expected error");
        assert!(matches!(err, DblpError::Parse(_)));
    }
}
