use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::QuestionBank;
use crate::config::Config;
use crate::session::result::{DiagnosticResult, PracticeSession};

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub diagnostic_results: Vec<DiagnosticResult>,
    #[serde(default)]
    pub practice_sessions: Vec<PracticeSession>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            name: String::new(),
            diagnostic_results: Vec::new(),
            practice_sessions: Vec::new(),
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Store a diagnostic result, replacing any earlier one for the same course.
    pub fn add_diagnostic_result(&mut self, result: DiagnosticResult) {
        match self
            .diagnostic_results
            .iter_mut()
            .find(|r| r.course_id == result.course_id)
        {
            Some(existing) => *existing = result,
            None => self.diagnostic_results.push(result),
        }
    }

    pub fn add_practice_session(&mut self, session: PracticeSession) {
        self.practice_sessions.push(session);
    }

    pub fn diagnostic_for(&self, course_id: &str) -> Option<&DiagnosticResult> {
        self.diagnostic_results
            .iter()
            .find(|r| r.course_id == course_id)
    }

    pub fn practice_session(&self, id: &str) -> Option<&PracticeSession> {
        self.practice_sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions_for<'a>(&'a self, course_id: &'a str) -> impl Iterator<Item = &'a PracticeSession> {
        self.practice_sessions
            .iter()
            .filter(move |s| s.course_id == course_id)
    }

    pub fn clear(&mut self) {
        *self = ProfileData::default();
    }
}

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub adaptutor_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub profile: ProfileData,
    pub catalog: QuestionBank,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::session::attempt::Attempt;

    fn diagnostic(course_id: &str, skill_level: u32) -> DiagnosticResult {
        DiagnosticResult {
            course_id: course_id.to_string(),
            skill_level,
            attempts: Vec::new(),
            average_time: 12.5,
            correct_percentage: 60.0,
            vark_style: None,
        }
    }

    fn practice(course_id: &str) -> PracticeSession {
        PracticeSession::from_attempts(
            course_id,
            vec![Attempt {
                question_id: "q".to_string(),
                correct: true,
                time_taken: 3,
                difficulty: 4,
            }],
            4,
            5,
            Utc.with_ymd_and_hms(2026, 5, 2, 8, 30, 0).unwrap(),
        )
    }

    #[test]
    fn diagnostic_result_replaces_same_course() {
        let mut profile = ProfileData::default();
        profile.add_diagnostic_result(diagnostic("algebra", 3));
        profile.add_diagnostic_result(diagnostic("geometry", 6));
        profile.add_diagnostic_result(diagnostic("algebra", 7));

        assert_eq!(profile.diagnostic_results.len(), 2);
        assert_eq!(profile.diagnostic_for("algebra").unwrap().skill_level, 7);
        assert_eq!(profile.diagnostic_for("geometry").unwrap().skill_level, 6);
        assert!(profile.diagnostic_for("calculus").is_none());
    }

    #[test]
    fn practice_sessions_append_and_lookup() {
        let mut profile = ProfileData::default();
        let a = practice("algebra");
        let b = practice("algebra");
        let c = practice("geometry");
        let b_id = b.id.clone();
        profile.add_practice_session(a);
        profile.add_practice_session(b);
        profile.add_practice_session(c);

        assert_eq!(profile.practice_sessions.len(), 3);
        assert_eq!(profile.sessions_for("algebra").count(), 2);
        assert_eq!(profile.practice_session(&b_id).unwrap().course_id, "algebra");
        assert!(profile.practice_session("missing").is_none());
    }

    #[test]
    fn clear_resets_everything() {
        let mut profile = ProfileData::default();
        profile.name = "Ada".to_string();
        profile.add_diagnostic_result(diagnostic("algebra", 3));
        profile.add_practice_session(practice("algebra"));
        profile.clear();
        assert_eq!(profile, ProfileData::default());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let profile: ProfileData = serde_json::from_str(r#"{"schema_version":1}"#).unwrap();
        assert!(!profile.needs_reset());
        assert!(profile.diagnostic_results.is_empty());
        assert!(profile.practice_sessions.is_empty());
    }

    #[test]
    fn stale_schema_needs_reset() {
        let profile: ProfileData = serde_json::from_str(r#"{"schema_version":0}"#).unwrap();
        assert!(profile.needs_reset());
    }
}
