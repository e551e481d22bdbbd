// Session storage contract
//
// A small key-value abstraction over per-device storage. The API client
// reads the auth token through it and clears it on 401; durable
// implementations live in `cookiefy-core`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

/// Storage key for the bearer token.
pub const AUTH_TOKEN_KEY: &str = "@cookiefy_admin_token";

/// Storage key for the serialized user record.
pub const USER_DATA_KEY: &str = "@cookiefy_admin_user";

/// Failure reading or writing session storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session storage at {} is corrupt: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("session storage lock poisoned")]
    Poisoned,
}

/// Key-value persistence for the auth token and cached user.
///
/// Single-key operations carry no cross-key guarantees. The batch
/// methods default to applying single operations in order; durable
/// stores override them to commit the whole batch at once.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with an existing session (tests, fixtures).
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut map = self.lock()?;
        for (key, value) in entries {
            map.insert((*key).to_owned(), (*value).to_owned());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.lock()?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_remove() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(AUTH_TOKEN_KEY).ok().flatten(), None);

        store.set(AUTH_TOKEN_KEY, "abc").ok();
        assert_eq!(store.get(AUTH_TOKEN_KEY).ok().flatten().as_deref(), Some("abc"));

        store.remove(AUTH_TOKEN_KEY).ok();
        assert_eq!(store.get(AUTH_TOKEN_KEY).ok().flatten(), None);
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let store = MemorySessionStore::new();
        assert!(store.remove(USER_DATA_KEY).is_ok());
    }

    #[test]
    fn batch_operations_touch_every_key() {
        let store = MemorySessionStore::new();
        store
            .set_many(&[(AUTH_TOKEN_KEY, "t"), (USER_DATA_KEY, r#"{"username":"u"}"#)])
            .ok();
        assert!(store.get(USER_DATA_KEY).ok().flatten().is_some());

        store.remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY]).ok();
        assert_eq!(store.get(AUTH_TOKEN_KEY).ok().flatten(), None);
        assert_eq!(store.get(USER_DATA_KEY).ok().flatten(), None);
    }
}
