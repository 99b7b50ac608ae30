use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use adaptutor::catalog::Question;
use adaptutor::session::quiz::AnswerOutcome;

use crate::ui::theme::Theme;

pub struct QuestionCard<'a> {
    pub question: &'a Question,
    pub number: usize,
    pub total: usize,
    pub answer: &'a str,
    pub outcome: Option<&'a AnswerOutcome>,
    pub locale: &'a str,
    pub theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(
        question: &'a Question,
        number: usize,
        total: usize,
        answer: &'a str,
        locale: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            question,
            number,
            total,
            answer,
            outcome: None,
            locale,
            theme,
        }
    }

    pub fn outcome(mut self, outcome: Option<&'a AnswerOutcome>) -> Self {
        self.outcome = outcome;
        self
    }

    fn feedback_lines(&self, outcome: &AnswerOutcome) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let color = if outcome.feedback.is_positive() {
            colors.success()
        } else {
            colors.error()
        };

        let mut lines = vec![Line::from(Span::styled(
            format!("  {}", outcome.feedback.message(self.locale)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if !outcome.attempt.correct {
            lines.push(Line::from(Span::styled(
                format!(
                    "  {}",
                    t!(
                        "ui.quiz.answer",
                        locale = self.locale,
                        answer = self.question.correct_answer
                    )
                ),
                Style::default().fg(colors.fg()),
            )));
        }

        let (from, to) = (outcome.previous_difficulty, outcome.difficulty);
        let level = if to > from {
            t!("ui.quiz.level_up", locale = self.locale, from = from, to = to)
        } else if to < from {
            t!("ui.quiz.level_down", locale = self.locale, from = from, to = to)
        } else {
            t!("ui.quiz.level_same", locale = self.locale, level = to)
        };
        lines.push(Line::from(Span::styled(
            format!("  {level}"),
            Style::default().fg(colors.muted()),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", t!("ui.hints.continue", locale = self.locale)),
            Style::default().fg(colors.accent()),
        )));
        lines
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = format!(
            " {} ",
            t!(
                "ui.quiz.title",
                locale = self.locale,
                number = self.number,
                total = self.total,
                difficulty = self.question.difficulty
            )
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let option_rows = self.question.options.len() as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(option_rows),
                Constraint::Length(2),
                Constraint::Length(4),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.question.statement.as_str(),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(ratatui::widgets::Padding::horizontal(2)))
        .render(layout[0], buf);

        if option_rows > 0 {
            let options: Vec<Line> = self
                .question
                .options
                .iter()
                .map(|o| {
                    Line::from(Span::styled(
                        format!("    - {o}"),
                        Style::default().fg(colors.muted()),
                    ))
                })
                .collect();
            Paragraph::new(options).render(layout[1], buf);
        }

        let input_style = if self.outcome.is_some() {
            Style::default().fg(colors.muted())
        } else {
            Style::default().fg(colors.accent())
        };
        let cursor = if self.outcome.is_some() { "" } else { "_" };
        Paragraph::new(Line::from(vec![
            Span::styled("  > ", input_style),
            Span::styled(format!("{}{cursor}", self.answer), input_style),
        ]))
        .render(layout[2], buf);

        if let Some(outcome) = self.outcome {
            Paragraph::new(self.feedback_lines(outcome)).render(layout[3], buf);
        }
    }
}
