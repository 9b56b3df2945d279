//! Session history
//!
//! A [`GameRecord`] is written once when a game session ends and never
//! changed afterwards. The caller decides what goes in it; the store only adds
//! the time it was saved.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format of the human-readable `date` field
pub const RECORD_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Number of records returned when the caller does not ask for a limit
pub const DEFAULT_RECORD_LIMIT: usize = 50;

/// One completed game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Fields supplied by the caller
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,

    /// Unix timestamp in milliseconds when the record was saved. Records
    /// imported from old backups may lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Local date and time when the record was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl GameRecord {
    /// Stamp caller-supplied fields with the save time.
    ///
    /// `timestamp` and `date` in `details` are overwritten.
    pub fn stamp(mut details: BTreeMap<String, Value>, now: DateTime<Local>) -> Self {
        details.remove("timestamp");
        details.remove("date");
        Self {
            details,
            timestamp: Some(now.timestamp_millis()),
            date: Some(now.format(RECORD_DATE_FORMAT).to_string()),
        }
    }

    /// Look up a caller-supplied field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.details.get(field)
    }
}

/// A ready-made record shape for callers without their own
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Game mode played
    pub mode: String,
    /// Word bank the session drew from
    pub bank: String,
    /// Final score
    pub score: u32,
    /// Correct answers in the session
    pub correct: u32,
    /// Wrong answers in the session
    pub wrong: u32,
    /// Session length in seconds
    pub duration_secs: u64,
}

/// The last `limit` records, newest first
pub fn most_recent(records: &[GameRecord], limit: usize) -> Vec<GameRecord> {
    records.iter().rev().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn details(score: i64) -> BTreeMap<String, Value> {
        BTreeMap::from([("score".to_string(), json!(score))])
    }

    fn at(minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap()
    }

    #[test]
    fn stamp_adds_timestamp_and_date() {
        let now = at(30);
        let record = GameRecord::stamp(details(12), now);

        assert_eq!(record.timestamp, Some(now.timestamp_millis()));
        assert_eq!(record.date.as_deref(), Some("2024/05/01 10:30:00"));
        assert_eq!(record.get("score"), Some(&json!(12)));
    }

    #[test]
    fn stamp_overrides_caller_timestamp() {
        let mut fields = details(1);
        fields.insert("timestamp".into(), json!(5));
        let record = GameRecord::stamp(fields, at(0));
        assert!(record.get("timestamp").is_none());
        assert_eq!(record.timestamp, Some(at(0).timestamp_millis()));
    }

    #[test]
    fn record_serializes_flat() {
        let record = GameRecord::stamp(details(3), at(0));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["score"], json!(3));
        assert_eq!(value["date"], json!("2024/05/01 10:00:00"));
        assert!(value.get("details").is_none());
    }

    #[test]
    fn record_deserializes_extra_fields() {
        let json = r#"{"score":9,"mode":"spell","timestamp":100,"date":"2024/01/01 00:00:00"}"#;
        let record: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp, Some(100));
        assert_eq!(record.get("mode"), Some(&json!("spell")));
        assert_eq!(record.details.len(), 2);
    }

    #[test]
    fn unstamped_record_round_trips_unchanged() {
        let json = r#"{"mode":"spell","score":4}"#;
        let record: GameRecord = serde_json::from_str(json).unwrap();

        assert!(record.timestamp.is_none());
        assert!(record.date.is_none());
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn most_recent_is_newest_first_and_bounded() {
        let records: Vec<_> = (0..5).map(|i| GameRecord::stamp(details(i), at(i as u32))).collect();

        let recent = most_recent(&records, 3);
        let scores: Vec<_> = recent.iter().map(|r| r.get("score").cloned().unwrap()).collect();
        assert_eq!(scores, vec![json!(4), json!(3), json!(2)]);

        assert_eq!(most_recent(&records, 50).len(), 5);
        assert!(most_recent(&records, 0).is_empty());
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = SessionSummary { duration_secs: 90, ..Default::default() };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""durationSecs":90"#));
    }
}
