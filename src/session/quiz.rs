use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use crate::catalog::Question;
use crate::config::Config;
use crate::engine::difficulty::{adjust_difficulty, clamp_difficulty};
use crate::engine::feedback::{Feedback, feedback};
use crate::engine::selector::{PracticeScope, QuestionSource, select_next};
use crate::engine::vark::VarkStyle;
use crate::session::attempt::{Attempt, answers_match, whole_seconds};
use crate::session::result::{DiagnosticResult, PracticeSession, SessionRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    Diagnostic,
    Practice,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Diagnostic => "diagnostic",
            SessionMode::Practice => "practice",
        }
    }

    pub fn max_attempts(self, config: &Config) -> usize {
        match self {
            SessionMode::Diagnostic => config.diagnostic_length,
            SessionMode::Practice => config.practice_length,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnswerOutcome {
    pub attempt: Attempt,
    pub feedback: Feedback,
    pub previous_difficulty: u32,
    pub difficulty: u32,
}

/// One diagnostic or practice run over a single course.
pub struct QuizSession {
    pub mode: SessionMode,
    pub course_id: String,
    pub max_attempts: usize,
    pub starting_difficulty: u32,
    pub difficulty: u32,
    pub attempts: Vec<Attempt>,
    pub vark_style: Option<VarkStyle>,
    asked: HashSet<String>,
    current: Option<Question>,
    scope: Option<PracticeScope>,
    complete: bool,
}

impl QuizSession {
    fn new(
        mode: SessionMode,
        course_id: &str,
        starting_difficulty: u32,
        scope: Option<PracticeScope>,
        config: &Config,
    ) -> Self {
        let starting_difficulty = clamp_difficulty(starting_difficulty);
        Self {
            mode,
            course_id: course_id.to_string(),
            max_attempts: mode.max_attempts(config),
            starting_difficulty,
            difficulty: starting_difficulty,
            attempts: Vec::new(),
            vark_style: None,
            asked: HashSet::new(),
            current: None,
            scope,
            complete: false,
        }
    }

    pub fn diagnostic(course_id: &str, config: &Config) -> Self {
        Self::new(
            SessionMode::Diagnostic,
            course_id,
            config.starting_difficulty,
            None,
            config,
        )
    }

    /// Practice starts at the course's diagnostic skill level when there is
    /// one, otherwise at the configured starting difficulty.
    pub fn practice(
        course_id: &str,
        diagnostic: Option<&DiagnosticResult>,
        scope: Option<PracticeScope>,
        config: &Config,
    ) -> Self {
        let start = diagnostic
            .map(|d| d.skill_level)
            .unwrap_or(config.starting_difficulty);
        Self::new(SessionMode::Practice, course_id, start, scope, config)
    }

    /// Attach the questionnaire result; it is stored with the diagnostic.
    pub fn with_vark_style(mut self, style: Option<VarkStyle>) -> Self {
        self.vark_style = style;
        self
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn correct_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.correct).count()
    }

    pub fn progress(&self) -> f64 {
        if self.max_attempts == 0 {
            return 1.0;
        }
        (self.attempts.len() as f64 / self.max_attempts as f64).min(1.0)
    }

    /// Load the next question. Returns the pending one if the last question
    /// is still unanswered. Marks the session complete once the attempt
    /// limit is hit or the course has no unseen questions left.
    pub fn next_question<S, R>(&mut self, source: &S, rng: &mut R) -> Option<&Question>
    where
        S: QuestionSource + ?Sized,
        R: Rng + ?Sized,
    {
        if self.complete {
            return None;
        }
        if self.current.is_some() {
            return self.current.as_ref();
        }
        if self.attempts.len() >= self.max_attempts {
            self.complete = true;
            return None;
        }

        let picked = select_next(
            source,
            &self.course_id,
            self.difficulty,
            &self.asked,
            self.scope.as_ref(),
            rng,
        )
        .cloned();

        match picked {
            Some(question) => {
                debug!(
                    course = %self.course_id,
                    question = %question.id,
                    target = self.difficulty,
                    actual = question.difficulty,
                    "question selected"
                );
                self.asked.insert(question.id.clone());
                self.current = Some(question);
                self.current.as_ref()
            }
            None => {
                info!(
                    course = %self.course_id,
                    asked = self.asked.len(),
                    "question pool exhausted"
                );
                self.complete = true;
                None
            }
        }
    }

    /// Grade an answer to the pending question. Blank answers are ignored.
    pub fn submit_answer(&mut self, answer: &str, elapsed: Duration) -> Option<AnswerOutcome> {
        if answer.trim().is_empty() {
            return None;
        }
        let question = self.current.take()?;
        let correct = answers_match(answer, &question.correct_answer);
        let time_taken = whole_seconds(elapsed);
        let kind = feedback(correct, time_taken as f64, question.target_time as f64);
        Some(self.record(&question, correct, time_taken, kind))
    }

    /// The countdown ran out: the question counts as wrong, at its full target time.
    pub fn time_up(&mut self) -> Option<AnswerOutcome> {
        let question = self.current.take()?;
        let time_taken = question.target_time;
        Some(self.record(&question, false, time_taken, Feedback::TimeUp))
    }

    fn record(
        &mut self,
        question: &Question,
        correct: bool,
        time_taken: u32,
        feedback: Feedback,
    ) -> AnswerOutcome {
        let attempt = Attempt {
            question_id: question.id.clone(),
            correct,
            time_taken,
            difficulty: question.difficulty,
        };

        let previous_difficulty = self.difficulty;
        self.difficulty = adjust_difficulty(
            self.difficulty,
            correct,
            time_taken as f64,
            question.target_time as f64,
        );
        if self.difficulty != previous_difficulty {
            debug!(
                from = previous_difficulty,
                to = self.difficulty,
                correct,
                time_taken,
                "difficulty adjusted"
            );
        }

        self.attempts.push(attempt.clone());
        if self.attempts.len() >= self.max_attempts {
            self.complete = true;
        }

        AnswerOutcome {
            attempt,
            feedback,
            previous_difficulty,
            difficulty: self.difficulty,
        }
    }

    /// Summarize the run. Nothing is produced when no question was answered.
    pub fn finish(&self, now: DateTime<Utc>) -> Option<SessionRecord> {
        if self.attempts.is_empty() {
            return None;
        }

        let record = match self.mode {
            SessionMode::Diagnostic => SessionRecord::Diagnostic(
                DiagnosticResult::from_attempts(&self.course_id, self.attempts.clone())
                    .with_vark_style(self.vark_style),
            ),
            SessionMode::Practice => SessionRecord::Practice(PracticeSession::from_attempts(
                &self.course_id,
                self.attempts.clone(),
                self.starting_difficulty,
                self.difficulty,
                now,
            )),
        };
        info!(
            mode = self.mode.as_str(),
            course = %self.course_id,
            attempts = self.attempts.len(),
            correct = self.correct_count(),
            "session finished"
        );
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::catalog::{Course, QuestionBank};

    fn bank(per_level: u32) -> QuestionBank {
        let mut bank = QuestionBank::default();
        bank.save_course(Course {
            id: "math".to_string(),
            name: "Math".to_string(),
            description: String::new(),
            chapters: Vec::new(),
        });
        for level in 1..=10 {
            for n in 0..per_level {
                bank.save_question(Question {
                    id: format!("m{level}-{n}"),
                    course_id: "math".to_string(),
                    statement: format!("level {level} #{n}"),
                    options: Vec::new(),
                    correct_answer: format!("{level}"),
                    difficulty: level,
                    target_time: 20,
                })
                .unwrap();
            }
        }
        bank
    }

    fn answer_current(session: &mut QuizSession, right: bool, secs: u64) -> AnswerOutcome {
        let expected = session.current_question().unwrap().correct_answer.clone();
        let given = if right { expected } else { "wrong".to_string() };
        session
            .submit_answer(&given, Duration::from_secs(secs))
            .unwrap()
    }

    #[test]
    fn diagnostic_runs_to_configured_length() {
        let bank = bank(3);
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut session = QuizSession::diagnostic("math", &config);
        assert_eq!(session.difficulty, 5);

        let mut rounds = 0;
        while session.next_question(&bank, &mut rng).is_some() {
            answer_current(&mut session, true, 2);
            rounds += 1;
        }
        assert_eq!(rounds, 5);
        assert!(session.is_complete());
        // Five fast correct answers climb from 5 to 10
        assert_eq!(session.difficulty, 10);
        assert_eq!(session.progress(), 1.0);
    }

    #[test]
    fn difficulty_follows_answers() {
        let bank = bank(2);
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut session = QuizSession::diagnostic("math", &config);

        let q = session.next_question(&bank, &mut rng).unwrap();
        assert_eq!(q.difficulty, 5);
        let outcome = answer_current(&mut session, true, 5);
        assert_eq!(outcome.previous_difficulty, 5);
        assert_eq!(outcome.difficulty, 6);
        assert_eq!(outcome.feedback, Feedback::VeryFast);

        let q = session.next_question(&bank, &mut rng).unwrap();
        assert_eq!(q.difficulty, 6);
        let outcome = answer_current(&mut session, false, 5);
        assert_eq!(outcome.difficulty, 5);
        assert_eq!(outcome.feedback, Feedback::Incorrect);
        assert!(!outcome.attempt.correct);
        assert_eq!(outcome.attempt.difficulty, 6);
    }

    #[test]
    fn questions_are_not_repeated() {
        let bank = bank(1);
        let mut config = Config::default();
        config.practice_length = 10;
        let mut rng = SmallRng::seed_from_u64(3);
        let mut session = QuizSession::practice("math", None, None, &config);

        let mut seen = HashSet::new();
        while let Some(q) = session.next_question(&bank, &mut rng) {
            assert!(seen.insert(q.id.clone()), "repeated {}", q.id);
            answer_current(&mut session, true, 15);
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn exhausted_pool_ends_session_early() {
        let bank = bank(1);
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut session = QuizSession::practice("math", None, None, &config);

        let mut rounds = 0;
        while session.next_question(&bank, &mut rng).is_some() {
            answer_current(&mut session, false, 3);
            rounds += 1;
        }
        assert_eq!(rounds, 10);
        assert!(session.is_complete());
        assert!(session.attempts.len() < session.max_attempts);
    }

    #[test]
    fn blank_answer_is_ignored() {
        let bank = bank(1);
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut session = QuizSession::diagnostic("math", &config);
        session.next_question(&bank, &mut rng).unwrap();

        assert!(session.submit_answer("   ", Duration::from_secs(1)).is_none());
        assert!(session.current_question().is_some());
        assert!(session.attempts.is_empty());
    }

    #[test]
    fn pending_question_is_returned_again() {
        let bank = bank(2);
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(6);
        let mut session = QuizSession::diagnostic("math", &config);
        let first = session.next_question(&bank, &mut rng).unwrap().id.clone();
        let again = session.next_question(&bank, &mut rng).unwrap().id.clone();
        assert_eq!(first, again);
    }

    #[test]
    fn time_up_records_wrong_answer_at_target_time() {
        let bank = bank(1);
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut session = QuizSession::diagnostic("math", &config);
        session.next_question(&bank, &mut rng).unwrap();

        let outcome = session.time_up().unwrap();
        assert_eq!(outcome.feedback, Feedback::TimeUp);
        assert!(!outcome.attempt.correct);
        assert_eq!(outcome.attempt.time_taken, 20);
        assert_eq!(outcome.difficulty, 4);
        assert!(session.time_up().is_none());
    }

    #[test]
    fn practice_starts_from_diagnostic_skill() {
        let config = Config::default();
        let diagnostic = DiagnosticResult::from_attempts(
            "math",
            vec![Attempt {
                question_id: "m8-0".to_string(),
                correct: true,
                time_taken: 4,
                difficulty: 8,
            }],
        );
        let session = QuizSession::practice("math", Some(&diagnostic), None, &config);
        assert_eq!(session.starting_difficulty, 8);
        assert_eq!(session.max_attempts, 20);

        let fresh = QuizSession::practice("math", None, None, &config);
        assert_eq!(fresh.starting_difficulty, 5);
    }

    #[test]
    fn finish_builds_records() {
        let bank = bank(5);
        let config = Config::default();
        let mut rng = SmallRng::seed_from_u64(8);
        let now = Utc::now();

        let empty = QuizSession::diagnostic("math", &config);
        assert!(empty.finish(now).is_none());

        let mut diag =
            QuizSession::diagnostic("math", &config).with_vark_style(Some(VarkStyle::Aural));
        while diag.next_question(&bank, &mut rng).is_some() {
            answer_current(&mut diag, true, 18);
        }
        match diag.finish(now) {
            Some(SessionRecord::Diagnostic(result)) => {
                assert_eq!(result.course_id, "math");
                assert_eq!(result.attempts.len(), 5);
                assert_eq!(result.correct_percentage, 100.0);
                // On-time answers hold the level at 5
                assert_eq!(result.skill_level, 5);
                assert_eq!(result.vark_style, Some(VarkStyle::Aural));
            }
            other => panic!("unexpected record {other:?}"),
        }

        let mut practice = QuizSession::practice("math", None, None, &config);
        practice.next_question(&bank, &mut rng).unwrap();
        answer_current(&mut practice, true, 1);
        match practice.finish(now) {
            Some(SessionRecord::Practice(session)) => {
                assert_eq!(session.starting_level, 5);
                assert_eq!(session.ending_level, 6);
                assert_eq!(session.level_change(), 1);
                assert_eq!(session.date, now);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }
}
