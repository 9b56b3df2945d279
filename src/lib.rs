//! wordgame - progress tracking for a vocabulary-memorization game
//!
//! Keeps per-word answer statistics, session history, overall progress and
//! game options in a key-value store, and moves them in and out of JSON
//! backups.

pub mod bank;
pub mod clock;
pub mod config;
pub mod records;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::{ConfigPatch, GameConfig};
pub use stats::{Outcome, Progress, WordStat};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{ProgressStore, StoreError};
