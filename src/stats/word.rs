//! Per-word learning statistics

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{accuracy_percent, lenient_percent};

/// Easiest difficulty, and the starting value for new words
pub const MIN_DIFFICULTY: u8 = 1;
/// Hardest difficulty
pub const MAX_DIFFICULTY: u8 = 3;
/// Highest mastery level
pub const MAX_MASTER_LEVEL: u8 = 5;

/// Attempts needed before difficulty starts adjusting
pub const DIFFICULTY_MIN_ATTEMPTS: u64 = 5;
/// Attempts needed before a mastery level is assigned
pub const MASTERY_MIN_ATTEMPTS: u64 = 10;

/// Result of answering a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Wrong,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "correct"),
            Outcome::Wrong => write!(f, "wrong"),
        }
    }
}

/// Returned when an answer outcome is neither `correct` nor `wrong`
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown outcome '{0}', expected 'correct' or 'wrong'")]
pub struct ParseOutcomeError(String);

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "correct" => Ok(Outcome::Correct),
            "wrong" => Ok(Outcome::Wrong),
            _ => Err(ParseOutcomeError(s.to_string())),
        }
    }
}

/// Learning statistics for one word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordStat {
    /// Has the word been answered at least once?
    pub studied: bool,

    /// Difficulty from 1 (easy) to 3 (hard)
    pub difficulty: u8,

    /// Number of wrong answers
    pub wrong_times: u64,

    /// Number of correct answers
    pub correct_times: u64,

    /// Correct answers as a percentage, one decimal
    #[serde(deserialize_with = "lenient_percent")]
    pub accuracy: f64,

    /// Unix timestamp in milliseconds of the last answer, 0 if never
    pub last_studied: i64,

    /// Mastery from 0 (unrated) to 5
    pub master_level: u8,
}

impl Default for WordStat {
    fn default() -> Self {
        Self {
            studied: false,
            difficulty: MIN_DIFFICULTY,
            wrong_times: 0,
            correct_times: 0,
            accuracy: 0.0,
            last_studied: 0,
            master_level: 0,
        }
    }
}

impl WordStat {
    /// Total answers recorded
    pub fn attempts(&self) -> u64 {
        self.correct_times.saturating_add(self.wrong_times)
    }

    /// Record an answer given at `now_ms` and refresh the derived fields.
    ///
    /// Difficulty only moves when `adjust_difficulty` is set and the word has
    /// at least [`DIFFICULTY_MIN_ATTEMPTS`] answers.
    pub fn record(&mut self, outcome: Outcome, adjust_difficulty: bool, now_ms: i64) {
        self.studied = true;
        self.last_studied = now_ms;

        match outcome {
            Outcome::Correct => self.correct_times = self.correct_times.saturating_add(1),
            Outcome::Wrong => self.wrong_times = self.wrong_times.saturating_add(1),
        }

        let total = self.attempts();
        self.accuracy = accuracy_percent(self.correct_times, total);

        if adjust_difficulty && total >= DIFFICULTY_MIN_ATTEMPTS {
            self.adjust_difficulty();
        }

        if total >= MASTERY_MIN_ATTEMPTS {
            self.master_level = master_level_for(self.accuracy);
        }
    }

    fn adjust_difficulty(&mut self) {
        if self.accuracy > 80.0 && self.difficulty > MIN_DIFFICULTY {
            self.difficulty -= 1;
        } else if self.accuracy < 40.0 && self.difficulty < MAX_DIFFICULTY {
            self.difficulty += 1;
        }
    }
}

/// Mastery level for an accuracy percentage
pub fn master_level_for(accuracy: f64) -> u8 {
    match accuracy {
        a if a >= 90.0 => 5,
        a if a >= 80.0 => 4,
        a if a >= 70.0 => 3,
        a if a >= 60.0 => 2,
        _ => 1,
    }
}
