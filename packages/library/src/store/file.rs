//! Directory-backed key-value store.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::{LibraryError, Result};

/// Stores each key as a file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LibraryError::Config(format!("invalid cache key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.dat")))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.dat.tmp"))
    }
}

fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Uses the atomic write pattern: every value goes to a temp file that is
    /// synced to disk, and only then are the temp files renamed into place.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        // Reject bad keys before anything touches the disk
        let targets = entries
            .iter()
            .map(|(key, _)| self.path_for(key))
            .collect::<Result<Vec<_>>>()?;

        fs::create_dir_all(&self.dir)?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(entries.len());
        for ((key, value), target) in entries.iter().zip(targets) {
            let temp = self.temp_path_for(key);
            if let Err(e) = write_synced(&temp, value) {
                let _ = fs::remove_file(&temp);
                for (staged_temp, _) in &staged {
                    let _ = fs::remove_file(staged_temp);
                }
                return Err(e.into());
            }
            staged.push((temp, target));
        }

        for (temp, target) in staged {
            // On Windows, rename fails if the destination already exists
            #[cfg(target_os = "windows")]
            if target.exists() {
                fs::remove_file(&target)?;
            }
            fs::rename(&temp, &target)?;
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_missing_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("library").unwrap(), None);
    }

    #[test]
    fn test_set_many_and_get() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        store
            .set_many(&[("library", "{}"), ("raw_text", "# Cat\n")])
            .unwrap();

        assert_eq!(store.get("library").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.get("raw_text").unwrap().as_deref(), Some("# Cat\n"));
        // No temp files left behind
        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_overwrite_and_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("raw_text", "old").unwrap();
        store.set("raw_text", "new").unwrap();
        assert_eq!(store.get("raw_text").unwrap().as_deref(), Some("new"));

        store.remove("raw_text").unwrap();
        assert_eq!(store.get("raw_text").unwrap(), None);
        // Removing twice is fine
        store.remove("raw_text").unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.get("../escape"),
            Err(LibraryError::Config(_))
        ));
        assert!(store.set("", "x").is_err());
    }

    #[test]
    fn test_invalid_key_in_batch_writes_nothing() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("library", "old").unwrap();

        let result = store.set_many(&[("library", "new"), ("../escape", "x")]);
        assert!(matches!(result, Err(LibraryError::Config(_))));

        assert_eq!(store.get("library").unwrap().as_deref(), Some("old"));
        let names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["library.dat".to_string()]);
    }
}
