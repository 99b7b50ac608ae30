use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Widget};

use crate::ui::theme::Theme;

/// Practice accuracy per session, oldest first.
pub struct AccuracyChart<'a> {
    pub data: &'a [(f64, f64)],
    pub locale: &'a str,
    pub theme: &'a Theme,
}

impl<'a> AccuracyChart<'a> {
    pub fn new(data: &'a [(f64, f64)], locale: &'a str, theme: &'a Theme) -> Self {
        Self {
            data,
            locale,
            theme,
        }
    }
}

impl Widget for AccuracyChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("ui.history.chart_title", locale = self.locale)))
            .border_style(Style::default().fg(colors.border()));

        if self.data.is_empty() {
            block.render(area, buf);
            return;
        }

        let max_x = self.data.last().map(|(x, _)| *x).unwrap_or(1.0).max(1.0);

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(colors.accent()))
            .data(self.data);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .title(t!("ui.history.chart_axis", locale = self.locale).into_owned())
                    .style(Style::default().fg(colors.muted()))
                    .bounds([1.0, max_x]),
            )
            .y_axis(
                Axis::default()
                    .title("%")
                    .style(Style::default().fg(colors.muted()))
                    .bounds([0.0, 100.0])
                    .labels(["0", "50", "100"]),
            );

        chart.render(area, buf);
    }
}
