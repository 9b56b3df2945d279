//! Error and load-status types for the progress store

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by store operations that write or parse data
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend rejected the write
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A record could not be encoded as JSON
    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        /// Which record set was being written
        what: &'static str,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// An import document was not valid
    #[error("Invalid backup document: {0}")]
    InvalidBackup(#[source] serde_json::Error),

    /// A game record did not encode to a JSON object
    #[error("Game record must be a JSON object")]
    InvalidRecord,
}

impl StoreError {
    /// Check if the backend ran out of space
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StoreError::Storage(StorageError::QuotaExceeded { .. }))
    }
}

/// How one record set came to hold its current value at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Read and parsed from storage
    Loaded,
    /// Nothing stored yet; defaults used
    Missing,
    /// Stored text was not valid; defaults used
    Corrupt(String),
    /// The backend failed to read; defaults used
    Unreadable(String),
}

impl LoadStatus {
    /// Whether defaults were substituted
    pub fn is_defaulted(&self) -> bool {
        !matches!(self, LoadStatus::Loaded)
    }

    /// Whether defaults were substituted because of a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, LoadStatus::Corrupt(_) | LoadStatus::Unreadable(_))
    }
}

/// Load outcome of every record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub config: LoadStatus,
    pub word_stats: LoadStatus,
    pub game_records: LoadStatus,
    pub progress: LoadStatus,
}

impl LoadReport {
    /// Whether any record set fell back to defaults because of a failure
    pub fn has_failures(&self) -> bool {
        self.statuses().iter().any(|status| status.is_failure())
    }

    /// Statuses in load order
    pub fn statuses(&self) -> [&LoadStatus; 4] {
        [&self.config, &self.word_stats, &self.game_records, &self.progress]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(progress: LoadStatus) -> LoadReport {
        LoadReport {
            config: LoadStatus::Loaded,
            word_stats: LoadStatus::Missing,
            game_records: LoadStatus::Loaded,
            progress,
        }
    }

    #[test]
    fn missing_is_defaulted_but_not_a_failure() {
        assert!(LoadStatus::Missing.is_defaulted());
        assert!(!LoadStatus::Missing.is_failure());
        assert!(!LoadStatus::Loaded.is_defaulted());
    }

    #[test]
    fn report_detects_failures() {
        assert!(!report(LoadStatus::Loaded).has_failures());
        assert!(report(LoadStatus::Corrupt("bad".into())).has_failures());
        assert!(report(LoadStatus::Unreadable("io".into())).has_failures());
    }

    #[test]
    fn quota_errors_are_recognized() {
        let err = StoreError::from(StorageError::QuotaExceeded {
            key: "wordGameStats".into(),
            needed: 2,
            limit: 1,
        });
        assert!(err.is_quota_exceeded());
        assert!(!StoreError::InvalidRecord.is_quota_exceeded());
    }
}
