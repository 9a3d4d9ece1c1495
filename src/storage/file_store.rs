use super::{KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const STATE_FILE: &str = "state.json";

/// JSON-file backed store. The whole map is rewritten on every mutation and
/// swapped into place with a rename, so readers never observe a partial file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or creates) the state file inside `dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the existing file is unreadable or not valid JSON.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(STATE_FILE);

        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "State file opened");
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.lock();
        let previous = entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.persist(&entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.lock();
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.persist(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("classifier-console-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = scratch_dir();
        let store = FileStore::open(&dir).unwrap();
        store.set("admin_token", "abc").unwrap();
        store.set("token_expires", "42").unwrap();
        drop(store);

        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("admin_token").as_deref(), Some("abc"));
        assert_eq!(reopened.get("token_expires").as_deref(), Some("42"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = scratch_dir();
        let store = FileStore::open(&dir).unwrap();
        store.set("admin_username", "ops").unwrap();

        store.remove("admin_username").unwrap();
        store.remove("admin_username").unwrap();
        assert!(store.get("admin_username").is_none());

        let reopened = FileStore::open(&dir).unwrap();
        assert!(reopened.get("admin_username").is_none());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(STATE_FILE), b"{not json").unwrap();

        let res = FileStore::open(&dir);
        assert!(matches!(res, Err(StorageError::Corrupt(_))));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
