use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use adaptutor::engine::metrics::{AccuracyBand, SkillBand, SpeedBand};
use adaptutor::session::result::SessionRecord;

use crate::ui::components::attempt_table::AttemptTable;
use crate::ui::theme::{Theme, ThemeColors};

/// End-of-session summary for either a diagnostic or a practice run.
pub struct Summary<'a> {
    pub record: &'a SessionRecord,
    pub course_name: &'a str,
    pub locale: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(record: &'a SessionRecord, course_name: &'a str, locale: &'a str, theme: &'a Theme) -> Self {
        Self {
            record,
            course_name,
            locale,
            theme,
        }
    }
}

fn accuracy_color(colors: &ThemeColors, band: AccuracyBand) -> Color {
    match band {
        AccuracyBand::Excellent => colors.success(),
        AccuracyBand::Good => colors.warning(),
        AccuracyBand::NeedsWork => colors.error(),
    }
}

fn row(label: &str, value: String, value_style: Style, detail: String, colors: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<10}"), Style::default().fg(colors.fg())),
        Span::styled(value, value_style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {detail}"), Style::default().fg(colors.muted())),
    ])
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let (title, attempts, average_time, correct_percentage) = match self.record {
            SessionRecord::Diagnostic(r) => (
                t!("ui.summary.diagnostic_title", locale = self.locale),
                &r.attempts,
                r.average_time,
                r.correct_percentage,
            ),
            SessionRecord::Practice(s) => (
                t!("ui.summary.practice_title", locale = self.locale),
                &s.attempts,
                s.average_time,
                s.correct_percentage,
            ),
        };

        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.course_name,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let level_label = t!("ui.summary.level", locale = self.locale);
        let level_line = match self.record {
            SessionRecord::Diagnostic(r) => row(
                &level_label,
                r.skill_level.to_string(),
                Style::default().fg(colors.accent()),
                SkillBand::from_level(r.skill_level).label(self.locale),
                colors,
            ),
            SessionRecord::Practice(s) => {
                let change = s.level_change();
                let change_color = if change > 0 {
                    colors.success()
                } else if change < 0 {
                    colors.error()
                } else {
                    colors.fg()
                };
                row(
                    &level_label,
                    format!("{} -> {}", s.starting_level, s.ending_level),
                    Style::default().fg(change_color),
                    format!("({change:+})"),
                    colors,
                )
            }
        };
        Paragraph::new(level_line).render(layout[1], buf);

        let correct = attempts.iter().filter(|a| a.correct).count();
        let accuracy = AccuracyBand::from_percentage(correct_percentage);
        Paragraph::new(row(
            &t!("ui.summary.accuracy", locale = self.locale),
            format!("{correct_percentage:.2}%"),
            Style::default().fg(accuracy_color(colors, accuracy)),
            t!(
                "ui.summary.correct_of",
                locale = self.locale,
                correct = correct,
                total = attempts.len(),
                band = accuracy.label(self.locale)
            )
            .into_owned(),
            colors,
        ))
        .render(layout[2], buf);

        let speed = SpeedBand::from_average_time(average_time);
        Paragraph::new(row(
            &t!("ui.summary.average_time", locale = self.locale),
            format!("{average_time:.2}s"),
            Style::default().fg(colors.fg()),
            speed.label(self.locale),
            colors,
        ))
        .render(layout[3], buf);

        if let SessionRecord::Diagnostic(r) = self.record
            && let Some(style) = r.vark_style
        {
            Paragraph::new(row(
                &t!("ui.summary.style", locale = self.locale),
                style.label(self.locale),
                Style::default().fg(colors.accent()),
                String::new(),
                colors,
            ))
            .render(layout[4], buf);
        }

        AttemptTable::new(attempts, self.locale, self.theme).render(layout[5], buf);

        let hints = [
            t!("ui.hints.retry", locale = self.locale),
            t!("ui.hints.history", locale = self.locale),
            t!("ui.hints.menu", locale = self.locale),
        ];
        Paragraph::new(Line::from(Span::styled(
            format!("  {}", hints.join("  ")),
            Style::default().fg(colors.accent()),
        )))
        .render(layout[6], buf);
    }
}
