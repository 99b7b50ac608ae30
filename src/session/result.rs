use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::metrics::{self, Metrics};
use crate::engine::vark::VarkStyle;
use crate::session::attempt::Attempt;

/// Outcome of a diagnostic run. One per course; a rerun replaces it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    pub course_id: String,
    pub skill_level: u32,
    pub attempts: Vec<Attempt>,
    pub average_time: f64,
    pub correct_percentage: f64,
    /// Learning style from the questionnaire taken before the run.
    #[serde(default)]
    pub vark_style: Option<VarkStyle>,
}

impl DiagnosticResult {
    pub fn from_attempts(course_id: &str, attempts: Vec<Attempt>) -> Self {
        let Metrics {
            average_time,
            correct_percentage,
            skill_level,
        } = metrics::summarize(&attempts);
        Self {
            course_id: course_id.to_string(),
            skill_level,
            attempts,
            average_time,
            correct_percentage,
            vark_style: None,
        }
    }

    pub fn with_vark_style(mut self, style: Option<VarkStyle>) -> Self {
        self.vark_style = style;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PracticeSession {
    pub id: String,
    pub course_id: String,
    pub date: DateTime<Utc>,
    pub attempts: Vec<Attempt>,
    pub average_time: f64,
    pub correct_percentage: f64,
    pub starting_level: u32,
    pub ending_level: u32,
}

impl PracticeSession {
    pub fn from_attempts(
        course_id: &str,
        attempts: Vec<Attempt>,
        starting_level: u32,
        ending_level: u32,
        date: DateTime<Utc>,
    ) -> Self {
        let summary = metrics::summarize(&attempts);
        Self {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            date,
            attempts,
            average_time: summary.average_time,
            correct_percentage: summary.correct_percentage,
            starting_level,
            ending_level,
        }
    }

    /// Levels gained (positive) or lost (negative) over the session.
    pub fn level_change(&self) -> i64 {
        self.ending_level as i64 - self.starting_level as i64
    }

    pub fn correct_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.correct).count()
    }
}

/// What a finished session produces for the profile.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionRecord {
    Diagnostic(DiagnosticResult),
    Practice(PracticeSession),
}
