//! Error types for the library.
//!
//! Only the transport, persistence and export layers can fail. The parser is
//! total and reports malformed markup through diagnostics instead.

use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Invalid remote document ID.
    #[error("Invalid document ID: '{0}'. Expected at least 10 characters of [A-Za-z0-9_-]")]
    InvalidDocId(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to fetch the remote document.
    #[error("Failed to fetch remote document {doc_id}: {source}")]
    RemoteFetch {
        doc_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// All retry attempts for a transient failure were used up.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// The remote answered with something other than plain text.
    #[error("Remote document {doc_id} is not plain text (content-type: {content_type}); is it shared publicly?")]
    NotText {
        doc_id: String,
        content_type: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested book does not exist in the library.
    #[error("Book not found: {0}")]
    BookNotFound(String),
}

impl LibraryError {
    /// Whether this error came from the remote transport.
    ///
    /// Transport errors are the ones a caller recovers from by falling back
    /// to the cached copy.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::RemoteFetch { .. }
                | Self::RetriesExhausted { .. }
                | Self::NotText { .. }
        )
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LibraryError::InvalidDocId("abc".to_string());
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_not_text_display() {
        let err = LibraryError::NotText {
            doc_id: "1AbCdEfGhIjK".to_string(),
            content_type: "text/html".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Remote document 1AbCdEfGhIjK is not plain text (content-type: text/html); is it shared publicly?"
        );
    }

    #[test]
    fn test_is_transport() {
        assert!(LibraryError::RetriesExhausted {
            attempts: 3,
            message: "Server error: 503".to_string(),
        }
        .is_transport());
        assert!(!LibraryError::Config("bad".to_string()).is_transport());
        assert!(!LibraryError::Io(std::io::Error::other("disk")).is_transport());
    }
}
