//! Learning statistics: per-word records and the progress aggregate

pub mod progress;
pub mod word;

pub use progress::Progress;
pub use word::{Outcome, WordStat};

use serde::{Deserialize, Deserializer};

/// Percentage of `correct` out of `attempts`, rounded to one decimal.
///
/// Zero attempts gives 0.
pub fn accuracy_percent(correct: u64, attempts: u64) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    round_one_decimal(correct as f64 / attempts as f64 * 100.0)
}

/// Round to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Accept a percentage written either as a number or as a numeric string.
///
/// Older saves stored accuracy as text such as `"83.3"`.
pub(crate) fn lenient_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid percentage: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "lenient_percent")]
        value: f64,
    }

    #[test]
    fn accuracy_with_no_attempts_is_zero() {
        assert_eq!(accuracy_percent(0, 0), 0.0);
    }

    #[test]
    fn accuracy_rounds_to_one_decimal() {
        assert_eq!(accuracy_percent(5, 6), 83.3);
        assert_eq!(accuracy_percent(2, 3), 66.7);
        assert_eq!(accuracy_percent(1, 3), 33.3);
        assert_eq!(accuracy_percent(1, 8), 12.5);
        assert_eq!(accuracy_percent(4, 4), 100.0);
    }

    #[test]
    fn lenient_percent_accepts_numbers_and_text() {
        let a: Holder = serde_json::from_str(r#"{"value":42.5}"#).unwrap();
        let b: Holder = serde_json::from_str(r#"{"value":"50.0"}"#).unwrap();
        let c: Holder = serde_json::from_str(r#"{"value":0}"#).unwrap();
        assert_eq!(a.value, 42.5);
        assert_eq!(b.value, 50.0);
        assert_eq!(c.value, 0.0);
    }

    #[test]
    fn lenient_percent_rejects_garbage() {
        assert!(serde_json::from_str::<Holder>(r#"{"value":"lots"}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"value":true}"#).is_err());
    }
}
