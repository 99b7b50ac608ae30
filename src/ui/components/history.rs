use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use adaptutor::catalog::Course;
use adaptutor::engine::metrics::SkillBand;
use adaptutor::session::result::PracticeSession;
use adaptutor::store::schema::ProfileData;

use crate::ui::components::chart::AccuracyChart;
use crate::ui::theme::Theme;

/// Practice rows shown, newest first. Selection never goes past the last one.
pub const MAX_ROWS: usize = 20;

/// Diagnostic result and practice log for one course, newest session first.
pub struct History<'a> {
    pub course: &'a Course,
    pub profile: &'a ProfileData,
    pub selected: usize,
    pub locale: &'a str,
    pub theme: &'a Theme,
}

impl<'a> History<'a> {
    pub fn new(
        course: &'a Course,
        profile: &'a ProfileData,
        selected: usize,
        locale: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            course,
            profile,
            selected,
            locale,
            theme,
        }
    }

    fn session_line(&self, session: &PracticeSession, is_selected: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let change = session.level_change();
        let change_color = if change > 0 {
            colors.success()
        } else if change < 0 {
            colors.error()
        } else {
            colors.muted()
        };
        let base = if is_selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        let indicator = if is_selected { ">" } else { " " };

        Line::from(vec![
            Span::styled(
                format!(
                    " {indicator} {}  {:>6.2}%  {:>6.2}s  ",
                    session.date.format("%Y-%m-%d %H:%M"),
                    session.correct_percentage,
                    session.average_time,
                ),
                base,
            ),
            Span::styled(
                format!(
                    "{} -> {} ({change:+})",
                    session.starting_level, session.ending_level
                ),
                Style::default().fg(change_color),
            ),
        ])
    }
}

impl Widget for History<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " {} ",
                t!("ui.history.title", locale = self.locale, course = self.course.name)
            ))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Percentage(50),
                Constraint::Min(6),
            ])
            .split(inner);

        let diagnostic_line = match self.profile.diagnostic_for(&self.course.id) {
            Some(result) => {
                let mut detail = t!(
                    "ui.history.diagnostic_detail",
                    locale = self.locale,
                    percent = format!("{:.2}", result.correct_percentage),
                    time = format!("{:.2}", result.average_time)
                )
                .into_owned();
                if let Some(style) = result.vark_style {
                    detail.push_str(&format!(", {}", style.label(self.locale)));
                }
                Line::from(vec![
                    Span::styled(
                        format!("  {} ", t!("ui.history.diagnostic", locale = self.locale)),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled(
                        t!(
                            "ui.history.diagnostic_level",
                            locale = self.locale,
                            level = result.skill_level,
                            band = SkillBand::from_level(result.skill_level).label(self.locale)
                        )
                        .into_owned(),
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  {detail}"), Style::default().fg(colors.muted())),
                ])
            }
            None => Line::from(Span::styled(
                format!("  {}", t!("ui.history.no_diagnostic", locale = self.locale)),
                Style::default().fg(colors.muted()),
            )),
        };
        Paragraph::new(diagnostic_line).render(layout[0], buf);

        let sessions: Vec<&PracticeSession> = self.profile.sessions_for(&self.course.id).collect();

        let mut lines = vec![Line::from(Span::styled(
            format!("   {}", t!("ui.history.columns", locale = self.locale)),
            Style::default().fg(colors.muted()),
        ))];
        if sessions.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("   {}", t!("ui.history.empty", locale = self.locale)),
                Style::default().fg(colors.muted()),
            )));
        }
        for (i, session) in sessions.iter().rev().take(MAX_ROWS).enumerate() {
            lines.push(self.session_line(session, i == self.selected));
        }
        Paragraph::new(lines).render(layout[1], buf);

        let data: Vec<(f64, f64)> = sessions
            .iter()
            .enumerate()
            .map(|(i, s)| ((i + 1) as f64, s.correct_percentage))
            .collect();
        AccuracyChart::new(&data, self.locale, self.theme).render(layout[2], buf);
    }
}
