//! Configuration constants and validation functions.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::error::{LibraryError, Result};

/// Base URL of the document-sharing service the source text is exported from.
pub const DEFAULT_REMOTE_BASE_URL: &str = "https://docs.google.com";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for transient transport failures.
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
pub const RETRY_BASE_DELAY_MS: u64 = 500;

/// Default directory for the offline cache.
pub const DEFAULT_CACHE_DIR: &str = ".psalmody-cache";

/// Version tag of the cached library envelope.
///
/// Bump when the shape of the document model changes; older caches are then
/// treated as a miss.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Cache key holding the library envelope (tree, raw text and source ID).
pub const CACHE_KEY_LIBRARY: &str = "library";

/// Text wrap width for terminal output.
pub const TEXT_WRAP_WIDTH: usize = 80;

/// Document ID pattern: the URL-safe alphabet used by the sharing service.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DOC_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{10,}$").expect("valid regex"));

/// Validate a remote document ID.
///
/// # Examples
/// ```
/// use psalmody_library::config::validate_doc_id;
///
/// assert!(validate_doc_id("1aBcD_eFgH-iJkLmNoP").is_ok());
/// assert!(validate_doc_id("../etc/passwd").is_err());
/// ```
pub fn validate_doc_id(doc_id: &str) -> Result<()> {
    if DOC_ID_PATTERN.is_match(doc_id) {
        Ok(())
    } else {
        Err(LibraryError::InvalidDocId(doc_id.to_string()))
    }
}

/// Build the plain-text export URL for a remote document.
///
/// # Panics
/// Debug builds panic if `doc_id` was not validated first.
pub fn export_url(base_url: &str, doc_id: &str) -> String {
    debug_assert!(
        DOC_ID_PATTERN.is_match(doc_id),
        "doc_id should be validated before calling export_url"
    );
    format!(
        "{}/document/d/{doc_id}/export?format=txt",
        base_url.trim_end_matches('/')
    )
}

/// Runtime configuration, read from the environment with CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub cache_dir: PathBuf,
    pub remote_base_url: String,
    pub doc_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            remote_base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            doc_id: None,
        }
    }
}

impl AppConfig {
    /// Read `PSALMODY_CACHE_DIR`, `PSALMODY_REMOTE_BASE_URL` and
    /// `PSALMODY_DOC_ID`, falling back to defaults.
    ///
    /// Values are not checked here; apply CLI overrides first, then call
    /// [`AppConfig::validate`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            cache_dir: non_empty("PSALMODY_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            remote_base_url: non_empty("PSALMODY_REMOTE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_REMOTE_BASE_URL.to_string()),
            doc_id: non_empty("PSALMODY_DOC_ID"),
        }
    }

    /// Check the remote settings.
    pub fn validate(&self) -> Result<()> {
        let url = &self.remote_base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(LibraryError::Config(format!(
                "remote base URL must be an http(s) URL, got '{url}'"
            )));
        }
        if let Some(id) = &self.doc_id {
            validate_doc_id(id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    #[must_use]
    pub fn with_remote_base_url(mut self, url: impl Into<String>) -> Self {
        self.remote_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }
}
