//! Offline cache of the last parsed library and its source text.
//!
//! The library, the raw text it was parsed from and the source document ID
//! live in one envelope under one key, so a save replaces all three or none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::config::{CACHE_FORMAT_VERSION, CACHE_KEY_LIBRARY};
use crate::error::Result;
use crate::types::Library;

/// Envelope as written.
#[derive(Debug, Serialize)]
struct CacheEnvelope<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    library: &'a Library,
    raw_text: Option<&'a str>,
    source_doc_id: Option<&'a str>,
}

/// Envelope as read back.
///
/// The library stays untyped until the version has been checked, and a
/// library that no longer deserializes does not hide the raw text.
#[derive(Debug, Deserialize)]
struct StoredEnvelope {
    version: u32,
    saved_at: DateTime<Utc>,
    library: serde_json::Value,
    #[serde(default)]
    raw_text: Option<String>,
    #[serde(default)]
    source_doc_id: Option<String>,
}

/// A library read back from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedLibrary {
    pub library: Library,
    pub saved_at: DateTime<Utc>,
}

/// Cache of the last successfully parsed library.
///
/// Reads never fail: missing, unreadable or outdated entries are a cache
/// miss.
#[derive(Debug)]
pub struct LibraryCache<S> {
    store: S,
}

impl<S: KeyValueStore> LibraryCache<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_envelope(&self) -> Option<StoredEnvelope> {
        let json = match self.store.get(CACHE_KEY_LIBRARY) {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                tracing::warn!(error = %e, "Cache entry is corrupt, ignoring it");
                None
            }
        }
    }

    /// The cached library with its save time.
    #[must_use]
    pub fn load_cached(&self) -> Option<CachedLibrary> {
        let envelope = self.read_envelope()?;
        if envelope.version != CACHE_FORMAT_VERSION {
            tracing::warn!(
                found = envelope.version,
                expected = CACHE_FORMAT_VERSION,
                "Cached library has an outdated format, ignoring it"
            );
            return None;
        }
        match serde_json::from_value(envelope.library) {
            Ok(library) => Some(CachedLibrary {
                library,
                saved_at: envelope.saved_at,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Cached library is corrupt, ignoring it");
                None
            }
        }
    }

    /// The last saved library, if any.
    #[must_use]
    pub fn load_cached_library(&self) -> Option<Library> {
        self.load_cached().map(|cached| cached.library)
    }

    /// The raw text the cached library was parsed from, if saved.
    ///
    /// Still returned when the cached tree is outdated, so it can be
    /// parsed again.
    #[must_use]
    pub fn load_cached_raw_text(&self) -> Option<String> {
        self.read_envelope()?.raw_text
    }

    /// The remote document ID the cache was filled from, if saved.
    #[must_use]
    pub fn load_source_doc_id(&self) -> Option<String> {
        self.read_envelope()?.source_doc_id
    }

    /// Save a library with its optional raw text and source document ID.
    ///
    /// One write replaces the previous entry. A `None` value is stored as
    /// absent, so a library is never paired with another save's source
    /// text. On error the previous entry is left as it was.
    pub fn save_library(
        &self,
        library: &Library,
        raw_text: Option<&str>,
        source_doc_id: Option<&str>,
    ) -> Result<()> {
        let envelope = CacheEnvelope {
            version: CACHE_FORMAT_VERSION,
            saved_at: Utc::now(),
            library,
            raw_text,
            source_doc_id,
        };
        let json = serde_json::to_string(&envelope)?;
        self.store.set(CACHE_KEY_LIBRARY, &json)?;

        tracing::debug!(
            categories = library.categories.len(),
            with_raw_text = raw_text.is_some(),
            "Saved library to cache"
        );
        Ok(())
    }

    /// Drop everything from the cache.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(CACHE_KEY_LIBRARY)
    }
}
