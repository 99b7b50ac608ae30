#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

mod app;
mod event;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adaptutor::config::Config;
use adaptutor::engine::selector::PracticeScope;
use adaptutor::session::quiz::SessionMode;
use adaptutor::store::json_store::JsonStore;
use adaptutor::store::schema::ExportData;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::history::History;
use ui::components::menu::CourseMenu;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::questionnaire::QuestionnaireCard;
use ui::components::session_detail::SessionDetail;
use ui::components::summary::Summary;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "adaptutor", version, about = "Adaptive quiz tutor for the terminal")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Message language (en, es)")]
    locale: Option<String>,

    #[arg(short, long, help = "Learner name shown in the menu")]
    name: Option<String>,

    #[arg(short, long, help = "Course to preselect")]
    course: Option<String>,

    #[arg(long, requires = "course", help = "Limit practice to one chapter")]
    chapter: Option<String>,

    #[arg(long, requires = "course", help = "Limit practice to one concept")]
    concept: Option<String>,

    #[arg(long, value_name = "FILE", conflicts_with = "import", help = "Write all data to FILE and exit")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Replace all data with FILE and exit")]
    import: Option<PathBuf>,
}

fn init_logging() -> Result<()> {
    let dir = JsonStore::default_dir();
    fs::create_dir_all(&dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("adaptutor.log"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("ADAPTUTOR_LOG")
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {e}");
    }

    let locales = adaptutor::available_locales();
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme.clone() {
        config.theme = theme;
    }
    if let Some(locale) = cli.locale.clone() {
        config.locale = locale;
    }
    config.validate(&locales);

    if let Some(ref path) = cli.export {
        return export_to(path, &config);
    }
    if let Some(ref path) = cli.import {
        return import_from(path, &locales);
    }

    let store = match JsonStore::new() {
        Ok(store) => {
            if store.check_interrupted_import() {
                warn!("removed backups left by an interrupted import");
            }
            if let Err(e) = store.initialize() {
                warn!(error = %e, "could not write initial data files");
            }
            Some(store)
        }
        Err(e) => {
            warn!(error = %e, "data directory unavailable, progress will not be saved");
            None
        }
    };

    let mut theme_warning = None;
    let theme = match Theme::resolve(&config.theme) {
        Ok(theme) => theme,
        Err(available) => {
            warn!(theme = %config.theme, ?available, "unknown theme, using default");
            theme_warning = Some(
                t!(
                    "ui.status.unknown_theme",
                    locale = config.locale.as_str(),
                    theme = config.theme,
                    available = available.join(", ")
                )
                .into_owned(),
            );
            let fallback = Theme::default();
            config.theme = fallback.name.clone();
            fallback
        }
    };
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let mut app = App::new(config, theme, store);
    app.status = theme_warning;

    if let Some(ref name) = cli.name {
        app.set_name(name);
    }

    if let Some(ref course_id) = cli.course {
        if app.select_course(course_id) {
            if cli.chapter.is_some() || cli.concept.is_some() {
                app.scope = Some(PracticeScope {
                    course_id: course_id.clone(),
                    chapter_id: cli.chapter.clone(),
                    concept: cli.concept.clone(),
                });
            }
        } else {
            app.status = Some(
                t!(
                    "ui.status.unknown_course",
                    locale = app.config.locale.as_str(),
                    course = course_id
                )
                .into_owned(),
            );
        }
    }

    info!(locale = %app.config.locale, theme = %app.theme.name, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn export_to(path: &Path, config: &Config) -> Result<()> {
    let store = JsonStore::new()?;
    store.initialize()?;
    let data = store.export_all(config)?;
    let json = serde_json::to_string_pretty(&data)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "exported");
    println!("Exported to {}", path.display());
    Ok(())
}

fn import_from(path: &Path, locales: &[&str]) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data: ExportData = serde_json::from_str(&content).context("parsing export file")?;

    let store = JsonStore::new()?;
    store.import_all(&data)?;

    let mut config = data.config;
    config.validate(locales);
    config.save()?;

    info!(path = %path.display(), "imported");
    println!("Imported from {}", path.display());
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Questionnaire => handle_questionnaire_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::SessionDetail => handle_session_detail_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('d') => app.start_diagnostic(),
        KeyCode::Char('p') | KeyCode::Enter => app.start_practice(),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Up | KeyCode::Char('k') => app.prev_course(),
        KeyCode::Down | KeyCode::Char('j') => app.next_course(),
        _ => {}
    }
}

fn handle_questionnaire_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Backspace => app.questionnaire_back(),
        KeyCode::Char(ch) => {
            if let Some(score) = ch.to_digit(10) {
                app.answer_questionnaire(score as u8);
            }
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.abandon_session(),
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char('j') | KeyCode::Down => app.history_next(),
        KeyCode::Char('k') | KeyCode::Up => app.history_prev(),
        KeyCode::Enter => app.open_selected_session(),
        _ => {}
    }
}

fn handle_session_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => {
            app.close_session_detail()
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app, layout.main),
        AppScreen::Questionnaire => render_questionnaire(frame, app, layout.main),
        AppScreen::Quiz => render_quiz(frame, app, layout.main),
        AppScreen::Result => render_result(frame, app, layout.main),
        AppScreen::History => render_history(frame, app, layout.main),
        AppScreen::SessionDetail => render_session_detail(frame, app, layout.main),
    }

    let hint_keys: &[&str] = match app.screen {
        AppScreen::Menu => &[
            "ui.hints.course",
            "ui.hints.diagnostic",
            "ui.hints.practice",
            "ui.hints.history",
            "ui.hints.quit",
        ],
        AppScreen::Questionnaire => &["ui.hints.score", "ui.hints.previous", "ui.hints.back"],
        AppScreen::Quiz => &["ui.hints.submit", "ui.hints.delete", "ui.hints.abandon"],
        AppScreen::Result => &["ui.hints.retry", "ui.hints.history", "ui.hints.menu"],
        AppScreen::History => &["ui.hints.select", "ui.hints.details", "ui.hints.menu"],
        AppScreen::SessionDetail => &["ui.hints.back"],
    };
    let locale = app.config.locale.as_str();
    let hints: Vec<String> = hint_keys
        .iter()
        .map(|key| t!(*key, locale = locale).into_owned())
        .collect();
    let hints: Vec<&str> = hints.iter().map(String::as_str).collect();
    let footer_text = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.muted()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;

    let locale = app.config.locale.as_str();
    let course = app.selected_course().map(|c| c.name.as_str()).unwrap_or("-");
    let mut info = if app.profile.name.is_empty() {
        format!(" {course}")
    } else {
        format!(" {} | {course}", app.profile.name)
    };
    if let Some(ref session) = app.session {
        let mode = match session.mode {
            SessionMode::Diagnostic => t!("ui.mode.diagnostic", locale = locale),
            SessionMode::Practice => t!("ui.mode.practice", locale = locale),
        };
        info.push_str(&format!(
            " | {}",
            t!(
                "ui.header.session",
                locale = locale,
                mode = mode,
                level = session.difficulty,
                correct = session.correct_count(),
                answered = session.attempts.len()
            )
        ));
    }
    if let Some(ref scope) = app.scope
        && app.session_mode() == Some(SessionMode::Practice)
    {
        let focus = scope
            .chapter_id
            .as_deref()
            .or(scope.concept.as_deref())
            .unwrap_or("");
        if !focus.is_empty() {
            info.push_str(&format!(
                " | {}",
                t!("ui.header.focus", locale = locale, focus = focus)
            ));
        }
    }

    let mut spans = vec![
        Span::styled(
            " adaptutor ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info, Style::default().fg(colors.muted()).bg(colors.header_bg())),
    ];
    if let Some(ref status) = app.status {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::default().fg(colors.warning()).bg(colors.header_bg()),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let menu_area = ui::layout::centered_rect(60, 80, area);
    let menu = CourseMenu::new(
        app.courses(),
        &app.profile,
        app.course_selected,
        &app.config.locale,
        app.theme,
    );
    frame.render_widget(&menu, menu_area);
}

fn render_questionnaire(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(ref questionnaire) = app.questionnaire else {
        return;
    };
    let body = ui::layout::centered_rect(70, 80, area);
    let card = QuestionnaireCard::new(questionnaire, &app.config.locale, app.theme);
    frame.render_widget(card, body);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    use ratatui::layout::{Constraint, Direction, Layout};

    let Some(ref session) = app.session else {
        return;
    };

    // After an answer the session has already let go of the question; look it up again.
    let question = match app.last_outcome {
        Some(ref outcome) => app.catalog.question(&outcome.attempt.question_id),
        None => session.current_question(),
    };
    let Some(question) = question else {
        return;
    };

    let body = ui::layout::centered_rect(70, 80, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(body);

    let answered = session.attempts.len();
    let locale = app.config.locale.as_str();
    let progress = ProgressBar::new(&t!("ui.quiz.progress", locale = locale), session.progress(), app.theme)
        .caption(format!("{answered}/{}", session.max_attempts));
    frame.render_widget(progress, rows[0]);

    let number = if app.last_outcome.is_some() {
        answered
    } else {
        answered + 1
    };
    let card = QuestionCard::new(
        question,
        number,
        session.max_attempts,
        &app.answer,
        &app.config.locale,
        app.theme,
    )
    .outcome(app.last_outcome.as_ref());
    frame.render_widget(card, rows[1]);

    if let Some((remaining, used)) = app.time_remaining() {
        let colors = &app.theme.colors;
        let fill = if used >= 0.8 {
            colors.error()
        } else if used >= 0.5 {
            colors.warning()
        } else {
            colors.success()
        };
        let label = if app.config.enforce_timer {
            t!("ui.quiz.time_left", locale = locale)
        } else {
            t!("ui.quiz.target_time", locale = locale)
        };
        let timer = ProgressBar::new(&label, 1.0 - used, app.theme)
            .caption(format!("{}s", remaining.as_secs()))
            .fill(fill);
        frame.render_widget(timer, rows[2]);
    }
}

fn render_result(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(ref record) = app.last_record else {
        return;
    };
    let course_name = app.selected_course().map(|c| c.name.as_str()).unwrap_or("");
    let centered = ui::layout::centered_rect(70, 90, area);
    let summary = Summary::new(record, course_name, &app.config.locale, app.theme);
    frame.render_widget(summary, centered);
}

fn render_history(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(course) = app.selected_course() else {
        return;
    };
    let history = History::new(
        course,
        &app.profile,
        app.history_selected,
        &app.config.locale,
        app.theme,
    );
    frame.render_widget(history, area);
}

fn render_session_detail(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(session) = app.viewed_session() else {
        return;
    };
    let course_name = app.selected_course().map(|c| c.name.as_str()).unwrap_or("");
    let centered = ui::layout::centered_rect(70, 90, area);
    let detail = SessionDetail::new(session, course_name, &app.config.locale, app.theme);
    frame.render_widget(detail, centered);
}
