//! Backup document format and the export artifact

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoreError;
use crate::config::GameConfig;
use crate::records::GameRecord;
use crate::stats::{Progress, WordStat};

/// MIME type of an exported backup
pub const BACKUP_CONTENT_TYPE: &str = "application/json";

/// Borrowed view of the store, written out as a backup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BackupRef<'a> {
    pub config: &'a GameConfig,
    pub word_stats: &'a BTreeMap<String, WordStat>,
    pub game_records: &'a [GameRecord],
    pub progress: &'a Progress,
    pub export_date: String,
}

/// A parsed backup document. Absent or null sections are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub config: Option<GameConfig>,
    pub word_stats: Option<BTreeMap<String, WordStat>>,
    pub game_records: Option<Vec<GameRecord>>,
    pub progress: Option<Progress>,
    /// When the backup was taken. Informational only, so any JSON value is kept.
    pub export_date: Option<Value>,
}

impl Backup {
    /// Parse a backup document.
    ///
    /// The root must be a JSON object, and every present section must have
    /// the right shape. Unknown top-level fields are ignored.
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        let value: Value = serde_json::from_str(text).map_err(StoreError::InvalidBackup)?;
        if !value.is_object() {
            return Err(StoreError::InvalidBackup(serde::de::Error::custom(
                "backup root must be a JSON object",
            )));
        }
        serde_json::from_value(value).map_err(StoreError::InvalidBackup)
    }

    /// Whether the document carries no section at all
    pub fn is_empty(&self) -> bool {
        self.config.is_none()
            && self.word_stats.is_none()
            && self.game_records.is_none()
            && self.progress.is_none()
    }
}

/// A serialized backup ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Document bytes
    pub blob: Vec<u8>,
    /// MIME type of `blob`
    pub content_type: &'static str,
    /// Suggested file name, `word_game_backup_<unix-ms>.json`
    pub filename: String,
}

impl ExportArtifact {
    /// Suggested file name for a backup taken at `unix_ms`
    pub fn filename_for(unix_ms: i64) -> String {
        format!("word_game_backup_{}.json", unix_ms)
    }

    /// Document as text
    pub fn as_str(&self) -> &str {
        // The blob is always produced from a `String`
        std::str::from_utf8(&self.blob).unwrap_or_default()
    }

    /// Write the backup into `dir` under its suggested name and return the path
    pub fn save_in(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.blob)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_partial_document() {
        let backup = Backup::parse(r#"{"progress":{"studied":1,"total":2,"accuracy":50,"streak":1,"lastStudyDate":null}}"#)
            .unwrap();
        assert!(backup.config.is_none());
        assert!(backup.word_stats.is_none());
        assert_eq!(backup.progress.unwrap().total, 2);
    }

    #[test]
    fn null_sections_are_absent() {
        let backup = Backup::parse(r#"{"config":null,"wordStats":null}"#).unwrap();
        assert!(backup.is_empty());
    }

    #[test]
    fn export_date_of_any_type_is_accepted() {
        let backup = Backup::parse(r#"{"exportDate":1714550400000,"config":{}}"#).unwrap();
        assert_eq!(backup.export_date, Some(Value::from(1714550400000_u64)));
        assert!(backup.config.is_some());
        assert!(!backup.is_empty());
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(matches!(Backup::parse("{not json"), Err(StoreError::InvalidBackup(_))));
    }

    #[test]
    fn parse_rejects_non_object_root() {
        assert!(Backup::parse("[1, 2]").is_err());
        assert!(Backup::parse("42").is_err());
    }

    #[test]
    fn parse_rejects_misshapen_section() {
        assert!(Backup::parse(r#"{"gameRecords":{"a":1}}"#).is_err());
        assert!(Backup::parse(r#"{"wordStats":[1]}"#).is_err());
    }

    #[test]
    fn filename_pattern() {
        assert_eq!(ExportArtifact::filename_for(1700000000000), "word_game_backup_1700000000000.json");
    }

    #[test]
    fn save_in_writes_blob() {
        let dir = TempDir::new().unwrap();
        let artifact = ExportArtifact {
            blob: b"{}".to_vec(),
            content_type: BACKUP_CONTENT_TYPE,
            filename: ExportArtifact::filename_for(1),
        };

        let path = artifact.save_in(dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "word_game_backup_1.json");
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
        assert_eq!(artifact.as_str(), "{}");
    }
}
