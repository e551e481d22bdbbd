// JSON-file session store
//
// All entries of one profile live in a single JSON object. Every write
// replaces the whole file (temp file + rename), so a batch of keys is
// committed atomically and a crash never leaves half a document behind.
// A file that no longer parses is reported on reads and overwritten by
// the next write.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cookiefy_api::{SessionStore, StorageError};
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// Session store persisted to a JSON file.
///
/// Operations do blocking file I/O. Async callers run them on the blocking
/// pool (the API client does) or accept a short stall for the few hundred
/// bytes involved.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within the process.
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<Entries, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write(&self, entries: &Entries) -> Result<(), StorageError> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_error(e)),
            };
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(entries).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = open_private(&tmp).map_err(|e| self.io_error(e))?;
            file.write_all(&json).map_err(|e| self.io_error(e))?;
            file.sync_all().map_err(|e| self.io_error(e))?;
        }
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), keys = entries.len(), "session file written");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = match self.read() {
            Err(StorageError::Corrupt { message, .. }) => {
                warn!(path = %self.path.display(), %message, "discarding corrupt session file");
                Entries::new()
            }
            other => other?,
        };
        f(&mut entries);
        self.write(&entries)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::File::create(path)
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn set_many(&self, batch: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|entries| {
            for (key, value) in batch {
                entries.insert((*key).to_owned(), (*value).to_owned());
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cookiefy_api::{AUTH_TOKEN_KEY, USER_DATA_KEY};
    use pretty_assertions::assert_eq;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("sessions").join("default.json"))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn entries_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        store_in(&dir)
            .set_many(&[(AUTH_TOKEN_KEY, "abc"), (USER_DATA_KEY, r#"{"username":"u"}"#)])
            .unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(
            reopened.get(USER_DATA_KEY).unwrap().as_deref(),
            Some(r#"{"username":"u"}"#)
        );
    }

    #[test]
    fn removing_everything_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        assert!(store.path().exists());

        store.remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY]).unwrap();
        assert!(!store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn unrelated_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("theme", "dark").unwrap();
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        store.remove(AUTH_TOKEN_KEY).unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(
            store.get(AUTH_TOKEN_KEY),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn writes_replace_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{truncated").unwrap();

        store
            .set_many(&[(AUTH_TOKEN_KEY, "abc"), (USER_DATA_KEY, r#"{"username":"u"}"#)])
            .unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn clearing_a_corrupt_file_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{truncated").unwrap();

        store.remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY]).unwrap();
        assert!(!store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
