//! Key-value persistence backends
//!
//! Everything the game keeps between runs goes through the [`Storage`] trait:
//! a string-keyed, string-valued store with no transactions. Each `set` is
//! committed on its own.

pub mod file;
pub mod memory;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key holding the game configuration
pub const CONFIG_KEY: &str = "wordGameConfig";
/// Key holding the per-word statistics map
pub const WORD_STATS_KEY: &str = "wordGameStats";
/// Key holding the session record list
pub const GAME_RECORDS_KEY: &str = "wordGameRecords";
/// Key holding the progress aggregate
pub const PROGRESS_KEY: &str = "wordGameProgress";

/// Every key the store writes, in load order
pub const ALL_KEYS: [&str; 4] = [CONFIG_KEY, WORD_STATS_KEY, GAME_RECORDS_KEY, PROGRESS_KEY];

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing or removing the backing file failed
    #[error("I/O error on key '{key}': {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The write would push the store past its size limit
    #[error("Quota exceeded writing '{key}': needs {needed} bytes, limit is {limit}")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Total bytes the store would hold after the write
        needed: usize,
        /// Configured limit in bytes
        limit: usize,
    },
}

/// A string-keyed, string-valued durable store
pub trait Storage {
    /// Read the value stored under `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
