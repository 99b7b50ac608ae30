use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use adaptutor::catalog::Course;
use adaptutor::engine::metrics::SkillBand;
use adaptutor::store::schema::ProfileData;

use crate::ui::theme::Theme;

/// Course picker. Each entry shows the course's last diagnostic level, if any.
pub struct CourseMenu<'a> {
    pub courses: &'a [Course],
    pub profile: &'a ProfileData,
    pub selected: usize,
    pub locale: &'a str,
    pub theme: &'a Theme,
}

impl<'a> CourseMenu<'a> {
    pub fn new(
        courses: &'a [Course],
        profile: &'a ProfileData,
        selected: usize,
        locale: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            courses,
            profile,
            selected,
            locale,
            theme,
        }
    }

    fn tagline(&self) -> String {
        if self.profile.name.is_empty() {
            t!("ui.tagline", locale = self.locale).into_owned()
        } else {
            t!("ui.greeting", locale = self.locale, name = self.profile.name).into_owned()
        }
    }

    fn level_text(&self, course: &Course) -> String {
        let Some(result) = self.profile.diagnostic_for(&course.id) else {
            return t!("ui.menu.no_diagnostic", locale = self.locale).into_owned();
        };
        let mut text = t!(
            "ui.menu.level",
            locale = self.locale,
            level = result.skill_level,
            band = SkillBand::from_level(result.skill_level).label(self.locale)
        )
        .into_owned();
        if let Some(style) = result.vark_style {
            text.push_str(", ");
            text.push_str(&t!(
                "ui.menu.style",
                locale = self.locale,
                style = style.label(self.locale)
            ));
        }
        text
    }
}

impl Widget for &CourseMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "adaptutor",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.tagline(),
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        if self.courses.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", t!("ui.menu.no_courses", locale = self.locale)),
                Style::default().fg(colors.warning()),
            )))
            .render(layout[2], buf);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.courses
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, course) in self.courses.iter().enumerate() {
            if i >= rows.len() {
                break;
            }
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let name_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(vec![
                    Span::styled(format!(" {indicator} {}", course.name), name_style),
                    Span::styled(
                        format!("  {}", self.level_text(course)),
                        Style::default().fg(colors.success()),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("     {}", course.description),
                    Style::default().fg(colors.muted()),
                )),
            ];
            Paragraph::new(lines).render(rows[i], buf);
        }
    }
}
