use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use adaptutor::session::attempt::Attempt;

use crate::ui::theme::Theme;

/// Per-question breakdown of a session, in the order the questions were asked.
pub struct AttemptTable<'a> {
    pub attempts: &'a [Attempt],
    pub locale: &'a str,
    pub theme: &'a Theme,
}

impl<'a> AttemptTable<'a> {
    pub fn new(attempts: &'a [Attempt], locale: &'a str, theme: &'a Theme) -> Self {
        Self {
            attempts,
            locale,
            theme,
        }
    }
}

impl Widget for AttemptTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", t!("ui.attempts.title", locale = self.locale)),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let header = format!(
            " {:>3}  {:<10}  {:>6}  {}",
            t!("ui.attempts.number", locale = self.locale),
            t!("ui.attempts.difficulty", locale = self.locale),
            t!("ui.attempts.time", locale = self.locale),
            t!("ui.attempts.result", locale = self.locale),
        );
        let mut lines = vec![Line::from(Span::styled(
            header,
            Style::default()
                .fg(colors.muted())
                .add_modifier(Modifier::BOLD),
        ))];

        let correct_label = t!("ui.attempts.correct", locale = self.locale);
        let incorrect_label = t!("ui.attempts.incorrect", locale = self.locale);
        for (i, attempt) in self.attempts.iter().enumerate() {
            let (result, result_color) = if attempt.correct {
                (&correct_label, colors.success())
            } else {
                (&incorrect_label, colors.error())
            };
            let time = format!("{}s", attempt.time_taken);
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:>3}  {:<10}  {time:>6}  ", i + 1, attempt.difficulty),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(result.to_string(), Style::default().fg(result_color)),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(correct: bool, time_taken: u32, difficulty: u32) -> Attempt {
        Attempt {
            question_id: format!("q{difficulty}"),
            correct,
            time_taken,
            difficulty,
        }
    }

    fn rendered(attempts: &[Attempt], locale: &str) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 48, 8);
        let mut buf = Buffer::empty(area);
        AttemptTable::new(attempts, locale, &theme).render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn one_row_per_attempt() {
        let text = rendered(&[attempt(true, 12, 4), attempt(false, 30, 5)], "en");
        assert!(text.contains("Difficulty"));
        assert!(text.contains("12s"));
        assert!(text.contains("30s"));
        assert!(text.contains("Correct"));
        assert!(text.contains("Incorrect"));
    }

    #[test]
    fn headers_follow_locale() {
        let text = rendered(&[attempt(true, 3, 2)], "es");
        assert!(text.contains("Dificultad"));
        assert!(text.contains("Correcta"));
    }
}
