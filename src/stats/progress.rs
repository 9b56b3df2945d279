//! Aggregate learning progress and the daily streak

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{WordStat, accuracy_percent, lenient_percent};
use crate::bank::{self, DEFAULT_BANK_ID};

/// Date format written to `lastStudyDate`
const STUDY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats accepted when reading `lastStudyDate`. The second is the
/// `Date.toDateString()` form found in browser-era backups.
const ACCEPTED_DATE_FORMATS: [&str; 2] = [STUDY_DATE_FORMAT, "%a %b %d %Y"];

/// Progress summary across all tracked words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    /// Number of words answered at least once
    pub studied: usize,

    /// Declared size of the active word bank
    pub total: usize,

    /// Correct answers over all answers, as a percentage
    #[serde(deserialize_with = "lenient_percent")]
    pub accuracy: f64,

    /// Consecutive study days
    pub streak: u32,

    /// Day of the last recompute
    pub last_study_date: Option<String>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            studied: 0,
            total: bank::lookup(DEFAULT_BANK_ID).count,
            accuracy: 0.0,
            streak: 0,
            last_study_date: None,
        }
    }
}

impl Progress {
    /// Build a fresh aggregate from word statistics, carrying the streak
    /// forward from `self` and stamping `today` as the study date.
    pub fn recompute<'a>(
        &self,
        stats: impl IntoIterator<Item = &'a WordStat>,
        total: usize,
        today: NaiveDate,
    ) -> Progress {
        let mut studied = 0;
        let mut correct: u64 = 0;
        let mut attempts: u64 = 0;
        for stat in stats {
            if stat.studied {
                studied += 1;
            }
            correct = correct.saturating_add(stat.correct_times);
            attempts = attempts.saturating_add(stat.attempts());
        }

        Progress {
            studied,
            total,
            accuracy: accuracy_percent(correct, attempts),
            streak: next_streak(self.streak, self.last_study_date.as_deref(), today),
            last_study_date: Some(today.format(STUDY_DATE_FORMAT).to_string()),
        }
    }
}

/// Streak after studying on `today`, given the previous streak and study date.
///
/// A one-day gap extends the streak, a longer gap restarts it at 1 and a
/// same-day study leaves it alone. No previous date starts it at 1. A date
/// that cannot be read leaves the streak unchanged.
pub fn next_streak(streak: u32, last_study_date: Option<&str>, today: NaiveDate) -> u32 {
    let Some(raw) = last_study_date else {
        return 1;
    };
    let Some(last) = parse_study_date(raw) else {
        return streak;
    };

    match (today - last).num_days() {
        1 => streak.saturating_add(1),
        gap if gap > 1 => 1,
        _ => streak,
    }
}

/// Read a study date in any accepted format, or from a full RFC 3339 timestamp
pub fn parse_study_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ACCEPTED_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
