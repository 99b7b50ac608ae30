use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use adaptutor::engine::vark::{MAX_SCORE, MIN_SCORE, QUESTIONS, Questionnaire, scale_label};

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// One learning-style statement with its agreement scale.
pub struct QuestionnaireCard<'a> {
    pub questionnaire: &'a Questionnaire,
    pub locale: &'a str,
    pub theme: &'a Theme,
}

impl<'a> QuestionnaireCard<'a> {
    pub fn new(questionnaire: &'a Questionnaire, locale: &'a str, theme: &'a Theme) -> Self {
        Self {
            questionnaire,
            locale,
            theme,
        }
    }
}

impl Widget for QuestionnaireCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(question) = self.questionnaire.current_question() else {
            return;
        };
        let total = QUESTIONS.len();
        let answered = self.questionnaire.current_index();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(10)])
            .split(area);

        let progress = answered as f64 / total as f64;
        ProgressBar::new(
            &t!("ui.questionnaire.title", locale = self.locale, number = answered + 1, total = total),
            progress,
            self.theme,
        )
        .caption(format!("{answered}/{total}"))
        .render(layout[0], buf);

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()))
            .padding(Padding::horizontal(2));
        let inner = block.inner(layout[1]);
        block.render(layout[1], buf);

        let mut lines = vec![
            Line::from(Span::styled(
                t!("ui.questionnaire.intro", locale = self.locale).into_owned(),
                Style::default().fg(colors.muted()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                question.prompt(self.locale),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for score in MIN_SCORE..=MAX_SCORE {
            let label = scale_label(score, self.locale).unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!("[{score}] "), Style::default().fg(colors.accent())),
                Span::styled(label, Style::default().fg(colors.fg())),
            ]));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
