use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use adaptutor::session::result::PracticeSession;

use crate::ui::components::attempt_table::AttemptTable;
use crate::ui::theme::Theme;

/// A past practice session opened from the history list.
pub struct SessionDetail<'a> {
    pub session: &'a PracticeSession,
    pub course_name: &'a str,
    pub locale: &'a str,
    pub theme: &'a Theme,
}

impl<'a> SessionDetail<'a> {
    pub fn new(
        session: &'a PracticeSession,
        course_name: &'a str,
        locale: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            course_name,
            locale,
            theme,
        }
    }
}

impl Widget for SessionDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        let block = Block::bordered()
            .title(format!(
                " {} ",
                t!(
                    "ui.detail.title",
                    locale = self.locale,
                    date = session.date.format("%Y-%m-%d %H:%M")
                )
            ))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(inner);

        let change = session.level_change();
        let change_color = if change > 0 {
            colors.success()
        } else if change < 0 {
            colors.error()
        } else {
            colors.muted()
        };
        let lines = vec![
            Line::from(Span::styled(
                format!("  {}", self.course_name),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(
                    format!(
                        "  {}",
                        t!(
                            "ui.detail.overview",
                            locale = self.locale,
                            percent = format!("{:.2}", session.correct_percentage),
                            time = format!("{:.2}", session.average_time),
                            from = session.starting_level,
                            to = session.ending_level
                        )
                    ),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(format!(" ({change:+})"), Style::default().fg(change_color)),
            ]),
        ];
        Paragraph::new(lines).render(layout[0], buf);

        AttemptTable::new(&session.attempts, self.locale, self.theme).render(layout[1], buf);
    }
}
