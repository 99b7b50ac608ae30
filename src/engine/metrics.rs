use serde::{Deserialize, Serialize};

use crate::engine::difficulty::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::session::attempt::Attempt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub average_time: f64,
    pub correct_percentage: f64,
    pub skill_level: u32,
}

/// Round to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reduce a batch of attempts to aggregate metrics.
///
/// Skill level is the rounded mean difficulty of the correct attempts. With
/// no correct attempts it falls back to half the last attempt's difficulty.
/// An empty batch yields all zeros.
pub fn summarize(attempts: &[Attempt]) -> Metrics {
    let Some(last) = attempts.last() else {
        return Metrics::default();
    };

    let count = attempts.len() as f64;
    let total_time: f64 = attempts.iter().map(|a| a.time_taken as f64).sum();
    let correct: Vec<&Attempt> = attempts.iter().filter(|a| a.correct).collect();

    let raw_skill = if correct.is_empty() {
        (last.difficulty as f64 / 2.0).round()
    } else {
        let sum: f64 = correct.iter().map(|a| a.difficulty as f64).sum();
        (sum / correct.len() as f64).round()
    };

    Metrics {
        average_time: round2(total_time / count),
        correct_percentage: round2(correct.len() as f64 / count * 100.0),
        skill_level: (raw_skill as u32).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
    }
}

// --- Ratings shown on result screens ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillBand {
    Beginner,
    Basic,
    Intermediate,
    Proficient,
    Advanced,
}

impl SkillBand {
    pub fn from_level(level: u32) -> Self {
        match level {
            9.. => SkillBand::Advanced,
            7..=8 => SkillBand::Proficient,
            5..=6 => SkillBand::Intermediate,
            3..=4 => SkillBand::Basic,
            _ => SkillBand::Beginner,
        }
    }

    pub fn message_key(self) -> &'static str {
        match self {
            SkillBand::Beginner => "skill.beginner",
            SkillBand::Basic => "skill.basic",
            SkillBand::Intermediate => "skill.intermediate",
            SkillBand::Proficient => "skill.proficient",
            SkillBand::Advanced => "skill.advanced",
        }
    }

    pub fn label(self, locale: &str) -> String {
        t!(self.message_key(), locale = locale).into_owned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccuracyBand {
    Excellent,
    Good,
    NeedsWork,
}

impl AccuracyBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            AccuracyBand::Excellent
        } else if percentage >= 60.0 {
            AccuracyBand::Good
        } else {
            AccuracyBand::NeedsWork
        }
    }

    pub fn message_key(self) -> &'static str {
        match self {
            AccuracyBand::Excellent => "accuracy.excellent",
            AccuracyBand::Good => "accuracy.good",
            AccuracyBand::NeedsWork => "accuracy.needs_work",
        }
    }

    pub fn label(self, locale: &str) -> String {
        t!(self.message_key(), locale = locale).into_owned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedBand {
    VeryFast,
    Average,
    Slow,
}

impl SpeedBand {
    pub fn from_average_time(average_time: f64) -> Self {
        if average_time <= 30.0 {
            SpeedBand::VeryFast
        } else if average_time <= 60.0 {
            SpeedBand::Average
        } else {
            SpeedBand::Slow
        }
    }

    pub fn message_key(self) -> &'static str {
        match self {
            SpeedBand::VeryFast => "speed.very_fast",
            SpeedBand::Average => "speed.average",
            SpeedBand::Slow => "speed.slow",
        }
    }

    pub fn label(self, locale: &str) -> String {
        t!(self.message_key(), locale = locale).into_owned()
    }
}
