//! Durable key-value store.
//!
//! # Responsibility
//! - Define the injected raw storage contract (`StoreBackend`).
//! - Provide the JSON-valued, never-failing store used by repositories.
//!
//! # Invariants
//! - `JsonStore` never returns an error; failures are logged and replaced by
//!   a benign default (`get` → caller default, `set`/`remove` → `false`).
//! - A corrupt entry reads exactly like a missing one.
//! - Every `set` is one discrete backend write.

use crate::db::DbError;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Backend-level failure. Never escapes `JsonStore`.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Write would exceed the backend's byte quota.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "writing `{key}` needs {required_bytes} bytes, quota is {quota_bytes}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "key-value store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "key-value store requires table `{table}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw string storage injected into `JsonStore`.
///
/// Implementations use interior mutability; callers hold `&self` only.
pub trait StoreBackend {
    /// Returns the stored text for `key`, if any.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    /// Inserts or replaces the text stored under `key`.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> StoreResult<()>;
    /// Lists every stored key in ascending order.
    fn list_keys(&self) -> StoreResult<Vec<String>>;
}

/// JSON-valued store over a backend, with the swallow-and-log failure policy.
pub struct JsonStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> JsonStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Direct access to the backend, bypassing JSON handling.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the value under `key`, or `default` when it is absent,
    /// unreadable or fails to deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=store_get module=store status=miss key={key}");
                return default;
            }
            Err(err) => {
                error!(
                    "event=store_get module=store status=error key={key} error_code=read_failed error={err}"
                );
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_get module=store status=error key={key} error_code=corrupt_value bytes={} error={err}",
                    raw.len()
                );
                default
            }
        }
    }

    /// Serializes and persists `value`. Returns whether the write happened.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=store_set module=store status=error key={key} error_code=serialize_failed error={err}"
                );
                return false;
            }
        };

        match self.backend.write(key, &raw) {
            Ok(()) => {
                debug!(
                    "event=store_set module=store status=ok key={key} bytes={}",
                    raw.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=store_set module=store status=error key={key} error_code=write_failed error={err}"
                );
                false
            }
        }
    }

    /// Removes `key`. Returns whether the backend accepted the removal.
    pub fn remove(&self, key: &str) -> bool {
        match self.backend.delete(key) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=store_remove module=store status=error key={key} error_code=delete_failed error={err}"
                );
                false
            }
        }
    }

    /// Whether any value, even an unparsable one, is stored under `key`.
    pub fn has(&self, key: &str) -> bool {
        match self.backend.read(key) {
            Ok(value) => value.is_some(),
            Err(err) => {
                error!(
                    "event=store_has module=store status=error key={key} error_code=read_failed error={err}"
                );
                false
            }
        }
    }

    /// Stored keys in ascending order; empty on backend failure.
    pub fn keys(&self) -> Vec<String> {
        self.backend.list_keys().unwrap_or_else(|err| {
            error!("event=store_keys module=store status=error error_code=list_failed error={err}");
            Vec::new()
        })
    }
}
