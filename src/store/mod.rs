//! The progress store
//!
//! [`ProgressStore`] owns the four record sets the game keeps (configuration,
//! word statistics, session records, progress) and mirrors every change to a
//! [`Storage`] backend. Loading never fails: anything missing or unreadable
//! is replaced by defaults and reported through [`LoadReport`]. Writes return
//! a [`StoreError`] but always keep the in-memory change.

pub mod backup;
pub mod error;

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bank::{self, BankInfo};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigPatch, GameConfig};
use crate::records::{self, GameRecord};
use crate::stats::{Outcome, Progress, WordStat};
use crate::storage::{
    ALL_KEYS, CONFIG_KEY, GAME_RECORDS_KEY, PROGRESS_KEY, Storage, WORD_STATS_KEY,
};

pub use backup::{BACKUP_CONTENT_TYPE, Backup, ExportArtifact};
pub use error::{LoadReport, LoadStatus, StoreError};

/// Persistent learning state for one player
pub struct ProgressStore<S: Storage> {
    storage: S,
    clock: Box<dyn Clock>,
    config: GameConfig,
    word_stats: BTreeMap<String, WordStat>,
    game_records: Vec<GameRecord>,
    progress: Progress,
    load_report: LoadReport,
}

impl<S: Storage> ProgressStore<S> {
    /// Load a store from `storage` using the system clock
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    /// Load a store from `storage` with an explicit time source
    pub fn with_clock(storage: S, clock: Box<dyn Clock>) -> Self {
        let (config, config_status) = load_record::<GameConfig>(&storage, CONFIG_KEY);
        let (word_stats, stats_status) =
            load_record::<BTreeMap<String, WordStat>>(&storage, WORD_STATS_KEY);
        let (game_records, records_status) =
            load_record::<Vec<GameRecord>>(&storage, GAME_RECORDS_KEY);
        let (progress, progress_status) = load_record::<Progress>(&storage, PROGRESS_KEY);

        tracing::debug!(
            "Loaded {} word stats and {} game records",
            word_stats.len(),
            game_records.len()
        );

        Self {
            storage,
            clock,
            config,
            word_stats,
            game_records,
            progress,
            load_report: LoadReport {
                config: config_status,
                word_stats: stats_status,
                game_records: records_status,
                progress: progress_status,
            },
        }
    }

    /// How each record set was obtained at startup
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// The storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage backend, dropping in-memory state
    pub fn into_storage(self) -> S {
        self.storage
    }

    // Configuration

    /// Snapshot of the current configuration
    pub fn get_config(&self) -> GameConfig {
        self.config.clone()
    }

    /// Merge `patch` into the configuration and persist it.
    ///
    /// The in-memory configuration is updated even if the write fails.
    pub fn save_config(&mut self, patch: ConfigPatch) -> Result<(), StoreError> {
        self.config.apply(patch);
        self.persist_config()
    }

    // Word statistics

    /// Statistics for `word`, or an unsaved zero record if it was never answered
    pub fn get_word_stat(&self, word: &str) -> WordStat {
        self.word_stats.get(word).cloned().unwrap_or_default()
    }

    /// All tracked words, ordered alphabetically
    pub fn word_stats(&self) -> &BTreeMap<String, WordStat> {
        &self.word_stats
    }

    /// Record an answer for `word` and return its updated statistics.
    ///
    /// A failed write is logged; the returned record reflects the answer
    /// either way.
    pub fn update_word_stat(&mut self, word: &str, outcome: Outcome) -> WordStat {
        let now_ms = self.clock.now().timestamp_millis();
        let adjust = self.config.difficulty_adjust;

        let stat = self.word_stats.entry(word.to_string()).or_default();
        stat.record(outcome, adjust, now_ms);
        let updated = stat.clone();

        if let Err(e) = self.persist_word_stats() {
            tracing::error!("Failed to save statistics for '{}': {}", word, e);
        }
        updated
    }

    // Session records

    /// Append a session record, stamped with the current time.
    ///
    /// `record` must serialize to a JSON object. The record stays in memory
    /// even if the write fails.
    pub fn save_game_record<T: Serialize>(&mut self, record: &T) -> Result<(), StoreError> {
        let details = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            Ok(_) => return Err(StoreError::InvalidRecord),
            Err(source) => return Err(StoreError::Serialize { what: "game record", source }),
        };

        self.game_records.push(GameRecord::stamp(details, self.clock.now()));
        write_record(&mut self.storage, GAME_RECORDS_KEY, &self.game_records, "game records")
            .inspect_err(|e| tracing::error!("Failed to save game record: {}", e))
    }

    /// The `limit` most recent session records, newest first
    pub fn get_game_records(&self, limit: usize) -> Vec<GameRecord> {
        records::most_recent(&self.game_records, limit)
    }

    // Word banks

    /// Switch the active word bank and persist the configuration
    pub fn set_current_bank(&mut self, id: &str) -> Result<(), StoreError> {
        self.save_config(ConfigPatch { current_bank: Some(id.to_string()), ..Default::default() })
    }

    /// Catalog entry for the active word bank
    pub fn get_current_bank(&self) -> BankInfo {
        bank::lookup(&self.config.current_bank)
    }

    // Progress

    /// Recompute and persist the progress aggregate; see [`Self::update_progress`]
    pub fn get_progress(&mut self) -> Progress {
        self.update_progress()
    }

    /// Recompute progress from word statistics and today's date, then persist it.
    ///
    /// Every call counts as studying today for the streak.
    pub fn update_progress(&mut self) -> Progress {
        let today = self.clock.now().date_naive();
        let total = self.get_current_bank().count;
        self.progress = self.progress.recompute(self.word_stats.values(), total, today);

        if let Err(e) = self.persist_progress() {
            tracing::error!("Failed to save progress: {}", e);
        }
        self.progress.clone()
    }

    /// Progress as last computed or loaded, without recomputing
    pub fn last_progress(&self) -> &Progress {
        &self.progress
    }

    // Bulk operations

    /// Serialize every record set into a backup document
    pub fn export_data(&self) -> Result<ExportArtifact, StoreError> {
        let now = self.clock.now();
        let document = backup::BackupRef {
            config: &self.config,
            word_stats: &self.word_stats,
            game_records: &self.game_records,
            progress: &self.progress,
            export_date: now.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let text = serde_json::to_string_pretty(&document)
            .map_err(|source| StoreError::Serialize { what: "backup", source })?;

        tracing::info!("Exported {} word stats", self.word_stats.len());
        Ok(ExportArtifact {
            blob: text.into_bytes(),
            content_type: BACKUP_CONTENT_TYPE,
            filename: ExportArtifact::filename_for(now.timestamp_millis()),
        })
    }

    /// Replace record sets with those found in a backup document.
    ///
    /// Sections missing from the document are left alone. Nothing changes if
    /// the document does not parse. If a write fails the remaining sections
    /// are still applied and the first error is returned.
    pub fn import_data(&mut self, text: &str) -> Result<(), StoreError> {
        let backup = Backup::parse(text)
            .inspect_err(|e| tracing::error!("Rejected import: {}", e))?;
        if backup.is_empty() {
            tracing::warn!("Backup holds no record sets; nothing imported");
            return Ok(());
        }

        let mut result = Ok(());

        if let Some(config) = backup.config {
            self.config = config;
            result = result.and(self.persist_config());
        }
        if let Some(word_stats) = backup.word_stats {
            self.word_stats = word_stats;
            result = result.and(self.persist_word_stats());
        }
        if let Some(game_records) = backup.game_records {
            self.game_records = game_records;
            result = result.and(write_record(
                &mut self.storage,
                GAME_RECORDS_KEY,
                &self.game_records,
                "game records",
            ));
        }
        if let Some(progress) = backup.progress {
            self.progress = progress;
            result = result.and(self.persist_progress());
        }

        match &result {
            Ok(()) => tracing::info!("Imported backup"),
            Err(e) => tracing::error!("Imported backup with write failures: {}", e),
        }
        result
    }

    /// Erase all stored data and return to defaults.
    ///
    /// Does nothing and returns `false` unless `confirmed` is set; asking the
    /// player is the caller's job. A key the backend will not remove is
    /// overwritten with its default value instead. If that fails too, the
    /// in-memory state is kept and `false` is returned.
    pub fn reset_data(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }

        let mut cleared = true;
        for key in ALL_KEYS {
            if let Err(e) = self.clear_key(key) {
                tracing::error!("Failed to clear '{}' during reset: {}", key, e);
                cleared = false;
            }
        }
        if !cleared {
            return false;
        }

        self.config = GameConfig::default();
        self.word_stats.clear();
        self.game_records.clear();
        self.progress = Progress::default();

        tracing::info!("Reset all game data");
        true
    }

    /// Write configuration, statistics and progress.
    ///
    /// Session records are already written as they are added. All three
    /// writes are attempted; the first failure is returned.
    pub fn save_all(&mut self) -> Result<(), StoreError> {
        let config = self.persist_config();
        let stats = self.persist_word_stats();
        let progress = self.persist_progress();
        config.and(stats).and(progress)
    }

    fn clear_key(&mut self, key: &str) -> Result<(), StoreError> {
        let Err(e) = self.storage.remove(key) else {
            return Ok(());
        };
        tracing::warn!("Failed to remove '{}', writing defaults over it: {}", key, e);

        let storage = &mut self.storage;
        match key {
            CONFIG_KEY => write_record(storage, key, &GameConfig::default(), "config"),
            WORD_STATS_KEY => {
                write_record(storage, key, &BTreeMap::<String, WordStat>::new(), "word stats")
            }
            GAME_RECORDS_KEY => write_record(storage, key, &Vec::<GameRecord>::new(), "game records"),
            _ => write_record(storage, key, &Progress::default(), "progress"),
        }
    }

    fn persist_config(&mut self) -> Result<(), StoreError> {
        write_record(&mut self.storage, CONFIG_KEY, &self.config, "config")
            .inspect_err(|e| tracing::error!("Failed to save config: {}", e))
    }

    fn persist_word_stats(&mut self) -> Result<(), StoreError> {
        write_record(&mut self.storage, WORD_STATS_KEY, &self.word_stats, "word stats")
    }

    fn persist_progress(&mut self) -> Result<(), StoreError> {
        write_record(&mut self.storage, PROGRESS_KEY, &self.progress, "progress")
    }
}

/// Read and parse one record set, substituting defaults on any problem
fn load_record<T>(storage: &impl Storage, key: &str) -> (T, LoadStatus)
where
    T: DeserializeOwned + Default,
{
    let text = match storage.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return (T::default(), LoadStatus::Missing),
        Err(e) => {
            tracing::warn!("Failed to read '{}', using defaults: {}", key, e);
            return (T::default(), LoadStatus::Unreadable(e.to_string()));
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => (value, LoadStatus::Loaded),
        Err(e) => {
            tracing::warn!("Failed to parse '{}', using defaults: {}", key, e);
            (T::default(), LoadStatus::Corrupt(e.to_string()))
        }
    }
}

fn write_record<T: Serialize + ?Sized>(
    storage: &mut impl Storage,
    key: &str,
    value: &T,
    what: &'static str,
) -> Result<(), StoreError> {
    let text =
        serde_json::to_string(value).map_err(|source| StoreError::Serialize { what, source })?;
    storage.set(key, &text)?;
    tracing::debug!("Saved {} ({} bytes)", what, text.len());
    Ok(())
}
