//! Sync service that ties fetching, parsing and caching together.

use crate::error::LibraryError;
use crate::parser::{parse, parse_with_diagnostics, Diagnostic};
use crate::remote::TextSource;
use crate::store::{KeyValueStore, LibraryCache};
use crate::types::Library;

/// What a sync produced.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The remote document was fetched and parsed.
    Fresh {
        library: Library,
        diagnostics: Vec<Diagnostic>,
    },
    /// The fetch failed; the cached library is returned instead.
    Cached {
        library: Library,
        error: LibraryError,
    },
    /// The fetch failed and nothing was cached.
    Empty { error: LibraryError },
}

impl SyncOutcome {
    /// The library to show, whichever way it was obtained.
    #[must_use]
    pub fn library(&self) -> Option<&Library> {
        match self {
            Self::Fresh { library, .. } | Self::Cached { library, .. } => Some(library),
            Self::Empty { .. } => None,
        }
    }

    /// Consume the outcome, yielding a library (empty if none was available).
    #[must_use]
    pub fn into_library(self) -> Library {
        match self {
            Self::Fresh { library, .. } | Self::Cached { library, .. } => library,
            Self::Empty { .. } => Library::new(),
        }
    }

    /// The fetch error, if the sync fell back.
    #[must_use]
    pub fn error(&self) -> Option<&LibraryError> {
        match self {
            Self::Fresh { .. } => None,
            Self::Cached { error, .. } | Self::Empty { error } => Some(error),
        }
    }
}

/// Fetch the source document, parse it and refresh the cache.
///
/// A fetch failure never leaves the caller with nothing if a previous copy
/// is cached. A cache write failure is logged and the fresh library is still
/// returned.
pub fn sync_library<S, T>(cache: &LibraryCache<S>, source: &T, doc_id: &str) -> SyncOutcome
where
    S: KeyValueStore,
    T: TextSource + ?Sized,
{
    let raw = match source.fetch(doc_id) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(doc_id, error = %error, "Fetch failed, falling back to cache");
            return match load_cached_or_reparse(cache) {
                Some(library) => SyncOutcome::Cached { library, error },
                None => SyncOutcome::Empty { error },
            };
        }
    };

    let output = parse_with_diagnostics(&raw);
    if let Err(e) = cache.save_library(&output.library, Some(&raw), Some(doc_id)) {
        tracing::warn!(error = %e, "Failed to save library to cache");
    }

    tracing::info!(
        doc_id,
        categories = output.library.categories.len(),
        skipped_lines = output.diagnostics.len(),
        "Synced library"
    );

    SyncOutcome::Fresh {
        library: output.library,
        diagnostics: output.diagnostics,
    }
}

/// Best library available without the network.
///
/// Prefers the cached tree, then re-parses the cached raw text, then falls
/// back to an empty library.
pub fn load_offline<S: KeyValueStore>(cache: &LibraryCache<S>) -> Library {
    load_cached_or_reparse(cache).unwrap_or_default()
}

fn load_cached_or_reparse<S: KeyValueStore>(cache: &LibraryCache<S>) -> Option<Library> {
    if let Some(library) = cache.load_cached_library() {
        return Some(library);
    }
    let raw = cache.load_cached_raw_text()?;
    tracing::info!("Rebuilding library from cached source text");
    Some(parse(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CACHE_KEY_LIBRARY;
    use crate::error::Result;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    const DOC_ID: &str = "0123456789abc";
    const SOURCE: &str = "# Agpeya\n## Prime\n### Opening\n[EN]\nO come let us worship";

    struct FixedSource(&'static str);

    impl TextSource for FixedSource {
        fn fetch(&self, _doc_id: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSource;

    impl TextSource for FailingSource {
        fn fetch(&self, _doc_id: &str) -> Result<String> {
            Err(LibraryError::RetriesExhausted {
                attempts: 3,
                message: "Server error: 503".to_string(),
            })
        }
    }

    #[test]
    fn test_fresh_sync_saves_everything() {
        let cache = LibraryCache::new(MemoryStore::new());
        let outcome = sync_library(&cache, &FixedSource(SOURCE), DOC_ID);

        assert!(matches!(outcome, SyncOutcome::Fresh { .. }));
        assert!(outcome.error().is_none());
        assert_eq!(cache.load_cached_library(), Some(parse(SOURCE)));
        assert_eq!(cache.load_cached_raw_text().as_deref(), Some(SOURCE));
        assert_eq!(cache.load_source_doc_id().as_deref(), Some(DOC_ID));
    }

    #[test]
    fn test_failed_fetch_falls_back_to_cache() {
        let cache = LibraryCache::new(MemoryStore::new());
        sync_library(&cache, &FixedSource(SOURCE), DOC_ID);

        let outcome = sync_library(&cache, &FailingSource, DOC_ID);
        assert!(matches!(outcome, SyncOutcome::Cached { .. }));
        assert!(outcome.error().is_some_and(LibraryError::is_transport));
        assert_eq!(outcome.into_library(), parse(SOURCE));
    }

    #[test]
    fn test_failed_fetch_without_cache_is_empty() {
        let cache = LibraryCache::new(MemoryStore::new());
        let outcome = sync_library(&cache, &FailingSource, DOC_ID);
        assert!(matches!(outcome, SyncOutcome::Empty { .. }));
        assert!(outcome.library().is_none());
        assert!(outcome.into_library().is_empty());
    }

    #[test]
    fn test_load_offline_reparses_raw_text_when_tree_is_corrupt() {
        let cache = LibraryCache::new(MemoryStore::new());
        let entry = serde_json::json!({
            "version": 1,
            "saved_at": "2024-01-01T00:00:00Z",
            "library": {"categories": "garbage"},
            "raw_text": SOURCE,
        });
        cache
            .store()
            .set(CACHE_KEY_LIBRARY, &entry.to_string())
            .unwrap();

        assert_eq!(load_offline(&cache), parse(SOURCE));
    }

    #[test]
    fn test_load_offline_unreadable_entry_is_empty() {
        let cache = LibraryCache::new(MemoryStore::new());
        sync_library(&cache, &FixedSource(SOURCE), DOC_ID);
        cache.store().set(CACHE_KEY_LIBRARY, "garbage").unwrap();

        assert!(load_offline(&cache).is_empty());
    }

    #[test]
    fn test_load_offline_empty() {
        let cache = LibraryCache::new(MemoryStore::new());
        assert!(load_offline(&cache).is_empty());
    }
}
