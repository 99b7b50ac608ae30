use std::time::{Duration, Instant};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use adaptutor::catalog::{Course, QuestionBank};
use adaptutor::config::Config;
use adaptutor::engine::selector::PracticeScope;
use adaptutor::engine::vark::{Questionnaire, VarkStyle};
use adaptutor::session::quiz::{AnswerOutcome, QuizSession, SessionMode};
use adaptutor::session::result::{PracticeSession, SessionRecord};
use adaptutor::store::json_store::JsonStore;
use adaptutor::store::schema::ProfileData;

use crate::ui::components::history::MAX_ROWS;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Questionnaire,
    Quiz,
    Result,
    History,
    SessionDetail,
}

pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub catalog: QuestionBank,
    pub profile: ProfileData,
    pub store: Option<JsonStore>,
    pub course_selected: usize,
    pub scope: Option<PracticeScope>,
    pub questionnaire: Option<Questionnaire>,
    pub session: Option<QuizSession>,
    pub answer: String,
    pub question_started: Option<Instant>,
    pub last_outcome: Option<AnswerOutcome>,
    pub outcome_shown_at: Option<Instant>,
    pub last_record: Option<SessionRecord>,
    pub history_selected: usize,
    pub viewed_session: Option<String>,
    pub status: Option<String>,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, store: Option<JsonStore>) -> Self {
        let (profile, catalog) = match store {
            Some(ref s) => {
                // A profile that fails to parse or carries an old schema starts over.
                let profile = match s.load_profile() {
                    Some(pd) if !pd.needs_reset() => pd,
                    Some(_) => {
                        warn!("profile schema changed, starting with an empty profile");
                        ProfileData::default()
                    }
                    None => ProfileData::default(),
                };
                let catalog = s.load_catalog().unwrap_or_else(|e| {
                    warn!(error = %e, "catalog unavailable, starting empty");
                    QuestionBank::default()
                });
                (profile, catalog)
            }
            None => (
                ProfileData::default(),
                QuestionBank::bundled().unwrap_or_default(),
            ),
        };

        Self {
            screen: AppScreen::Menu,
            theme,
            config,
            catalog,
            profile,
            store,
            course_selected: 0,
            scope: None,
            questionnaire: None,
            session: None,
            answer: String::new(),
            question_started: None,
            last_outcome: None,
            outcome_shown_at: None,
            last_record: None,
            history_selected: 0,
            viewed_session: None,
            status: None,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.catalog.courses
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.catalog.courses.get(self.course_selected)
    }

    /// Preselect a course by id. Returns false if the catalog has no such course.
    pub fn select_course(&mut self, course_id: &str) -> bool {
        match self.catalog.courses.iter().position(|c| c.id == course_id) {
            Some(idx) => {
                self.course_selected = idx;
                true
            }
            None => false,
        }
    }

    pub fn next_course(&mut self) {
        let len = self.catalog.courses.len();
        if len > 0 {
            self.course_selected = (self.course_selected + 1) % len;
        }
    }

    pub fn prev_course(&mut self) {
        let len = self.catalog.courses.len();
        if len == 0 {
            return;
        }
        if self.course_selected > 0 {
            self.course_selected -= 1;
        } else {
            self.course_selected = len - 1;
        }
    }

    /// A diagnostic opens with the learning-style questionnaire.
    pub fn start_diagnostic(&mut self) {
        if self.selected_course().is_none() {
            return;
        }
        self.questionnaire = Some(Questionnaire::default());
        self.status = None;
        self.screen = AppScreen::Questionnaire;
    }

    /// Score the current statement; the diagnostic starts after the last one.
    pub fn answer_questionnaire(&mut self, score: u8) {
        let Some(questionnaire) = self.questionnaire.as_mut() else {
            return;
        };
        if !questionnaire.answer(score) || !questionnaire.is_complete() {
            return;
        }
        let style = questionnaire.result(&mut self.rng);
        self.questionnaire = None;
        if let Some(style) = style {
            info!(style = ?style, "learning style scored");
        }
        self.begin_diagnostic(style);
    }

    /// Backspace: revisit the previous statement.
    pub fn questionnaire_back(&mut self) {
        if let Some(questionnaire) = self.questionnaire.as_mut() {
            questionnaire.back();
        }
    }

    fn begin_diagnostic(&mut self, style: Option<VarkStyle>) {
        let Some(course_id) = self.selected_course().map(|c| c.id.clone()) else {
            return;
        };
        let session = QuizSession::diagnostic(&course_id, &self.config).with_vark_style(style);
        self.begin(session);
    }

    pub fn start_practice(&mut self) {
        let Some(course_id) = self.selected_course().map(|c| c.id.clone()) else {
            return;
        };
        let scope = self
            .scope
            .clone()
            .filter(|s| s.applies_to(&course_id));
        let session = QuizSession::practice(
            &course_id,
            self.profile.diagnostic_for(&course_id),
            scope,
            &self.config,
        );
        self.begin(session);
    }

    /// Run the same kind of session again on the same course.
    pub fn retry(&mut self) {
        match self.last_record {
            Some(SessionRecord::Diagnostic(_)) => self.start_diagnostic(),
            Some(SessionRecord::Practice(_)) => self.start_practice(),
            None => self.go_to_menu(),
        }
    }

    fn begin(&mut self, session: QuizSession) {
        info!(
            mode = session.mode.as_str(),
            course = %session.course_id,
            level = session.difficulty,
            "session started"
        );
        self.session = Some(session);
        self.last_outcome = None;
        self.outcome_shown_at = None;
        self.status = None;
        self.screen = AppScreen::Quiz;
        self.load_next_question();
    }

    fn load_next_question(&mut self) {
        self.answer.clear();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.next_question(&self.catalog, &mut self.rng).is_some() {
            self.question_started = Some(Instant::now());
        } else {
            self.question_started = None;
            self.finish_session();
        }
    }

    pub fn awaiting_answer(&self) -> bool {
        self.last_outcome.is_none() && self.question_started.is_some()
    }

    pub fn type_char(&mut self, ch: char) {
        if self.awaiting_answer() {
            self.answer.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.awaiting_answer() {
            self.answer.pop();
        }
    }

    /// Enter: grade the typed answer, or move past the feedback being shown.
    pub fn submit(&mut self) {
        if self.last_outcome.is_some() {
            self.advance();
            return;
        }
        let Some(started) = self.question_started else {
            return;
        };
        let elapsed = started.elapsed();
        let outcome = self
            .session
            .as_mut()
            .and_then(|s| s.submit_answer(&self.answer, elapsed));
        if let Some(outcome) = outcome {
            self.show_outcome(outcome);
        }
    }

    fn show_outcome(&mut self, outcome: AnswerOutcome) {
        self.last_outcome = Some(outcome);
        self.outcome_shown_at = Some(Instant::now());
        self.question_started = None;
    }

    fn advance(&mut self) {
        self.last_outcome = None;
        self.outcome_shown_at = None;
        if self.session.as_ref().is_some_and(|s| s.is_complete()) {
            self.finish_session();
        } else {
            self.load_next_question();
        }
    }

    pub fn on_tick(&mut self) {
        if self.screen != AppScreen::Quiz {
            return;
        }

        // A zero delay leaves the feedback up until Enter.
        if let Some(shown) = self.outcome_shown_at {
            if self.config.feedback_delay_ms > 0
                && shown.elapsed() >= Duration::from_millis(self.config.feedback_delay_ms)
            {
                self.advance();
            }
            return;
        }

        if self.config.enforce_timer
            && let Some((remaining, _)) = self.time_remaining()
            && remaining.is_zero()
        {
            let outcome = self.session.as_mut().and_then(|s| s.time_up());
            if let Some(outcome) = outcome {
                self.show_outcome(outcome);
            }
        }
    }

    /// Time left on the current question and the fraction of its target time used.
    pub fn time_remaining(&self) -> Option<(Duration, f64)> {
        let started = self.question_started?;
        let question = self.session.as_ref()?.current_question()?;
        let target = Duration::from_secs(question.target_time as u64);
        let elapsed = started.elapsed();
        let used = if target.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / target.as_secs_f64()).min(1.0)
        };
        Some((target.saturating_sub(elapsed), used))
    }

    fn finish_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.question_started = None;
        self.last_outcome = None;
        self.outcome_shown_at = None;

        let Some(record) = session.finish(Utc::now()) else {
            let locale = self.config.locale.as_str();
            self.status = Some(t!("ui.status.no_questions", locale = locale).into_owned());
            self.screen = AppScreen::Menu;
            return;
        };

        match &record {
            SessionRecord::Diagnostic(result) => {
                self.profile.add_diagnostic_result(result.clone());
            }
            SessionRecord::Practice(practice) => {
                self.profile.add_practice_session(practice.clone());
            }
        }
        self.save_profile();
        self.last_record = Some(record);
        self.screen = AppScreen::Result;
    }

    /// Leave a running session. Unfinished sessions are not recorded.
    pub fn abandon_session(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                mode = session.mode.as_str(),
                course = %session.course_id,
                answered = session.attempts.len(),
                "session abandoned"
            );
        }
        self.go_to_menu();
    }

    fn save_profile(&mut self) {
        if let Some(ref store) = self.store
            && let Err(e) = store.save_profile(&self.profile)
        {
            warn!(error = %e, "failed to save profile");
            self.status = Some(
                t!(
                    "ui.status.save_failed",
                    locale = self.config.locale.as_str(),
                    error = e
                )
                .into_owned(),
            );
        }
    }

    /// Set the learner's display name and persist it. Blank names are ignored.
    pub fn set_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || name == self.profile.name {
            return;
        }
        self.profile.name = name.to_string();
        self.save_profile();
    }

    pub fn go_to_menu(&mut self) {
        self.questionnaire = None;
        self.viewed_session = None;
        self.session = None;
        self.answer.clear();
        self.question_started = None;
        self.last_outcome = None;
        self.outcome_shown_at = None;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_history(&mut self) {
        self.history_selected = 0;
        self.screen = AppScreen::History;
    }

    /// Practice sessions on the history list, newest first.
    pub fn history_sessions(&self) -> Vec<&PracticeSession> {
        let Some(course) = self.selected_course() else {
            return Vec::new();
        };
        let sessions: Vec<&PracticeSession> = self.profile.sessions_for(&course.id).collect();
        sessions.into_iter().rev().take(MAX_ROWS).collect()
    }

    /// Rows on the history list. Only the newest `MAX_ROWS` sessions are listed.
    pub fn history_len(&self) -> usize {
        self.history_sessions().len()
    }

    pub fn history_next(&mut self) {
        let len = self.history_len();
        if len > 0 {
            let max_visible = len.min(MAX_ROWS) - 1;
            self.history_selected = (self.history_selected + 1).min(max_visible);
        }
    }

    pub fn history_prev(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn open_selected_session(&mut self) {
        let id = self
            .history_sessions()
            .get(self.history_selected)
            .map(|s| s.id.clone());
        if let Some(id) = id {
            self.viewed_session = Some(id);
            self.screen = AppScreen::SessionDetail;
        }
    }

    pub fn viewed_session(&self) -> Option<&PracticeSession> {
        self.viewed_session
            .as_deref()
            .and_then(|id| self.profile.practice_session(id))
    }

    pub fn close_session_detail(&mut self) {
        self.viewed_session = None;
        self.screen = AppScreen::History;
    }

    pub fn session_mode(&self) -> Option<SessionMode> {
        self.session.as_ref().map(|s| s.mode)
    }
}
