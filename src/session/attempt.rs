use std::time::Duration;

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};

/// One answered question. `difficulty` is the question's rating at the time
/// it was asked and is never recomputed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub question_id: String,
    pub correct: bool,
    /// Whole seconds.
    pub time_taken: u32,
    pub difficulty: u32,
}

/// Canonical form used to compare answers: trimmed, NFC, lowercase.
pub fn normalize_answer(answer: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(answer.trim()).to_lowercase()
}

pub fn answers_match(given: &str, expected: &str) -> bool {
    normalize_answer(given) == normalize_answer(expected)
}

pub fn whole_seconds(elapsed: Duration) -> u32 {
    elapsed.as_secs_f64().round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_ignores_case_and_outer_whitespace() {
        assert!(answers_match("  10X - 3 ", "10x - 3"));
        assert!(answers_match("E^X", "e^x"));
        assert!(!answers_match("10x-3", "10x - 3"));
    }

    #[test]
    fn test_match_composes_accents() {
        // "é" typed as e + combining acute
        assert!(answers_match("cafe\u{301}", "caf\u{e9}"));
    }

    #[test]
    fn test_whole_seconds_rounds() {
        assert_eq!(whole_seconds(Duration::from_millis(0)), 0);
        assert_eq!(whole_seconds(Duration::from_millis(1499)), 1);
        assert_eq!(whole_seconds(Duration::from_millis(1500)), 2);
        assert_eq!(whole_seconds(Duration::from_secs(42)), 42);
    }
}
