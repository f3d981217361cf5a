//! Persistence for offline reuse.
//!
//! The cache is written through an injected [`KeyValueStore`], so the parser
//! and the cache logic never touch ambient storage directly.

mod cache;
mod file;
mod memory;

pub use cache::{CachedLibrary, LibraryCache};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// String key-value storage capability.
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several values as one unit.
    ///
    /// Every key is checked and every value staged before any existing
    /// value is replaced, so a bad key or a failed write leaves the previous
    /// values in place.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Write a single value.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }
}
