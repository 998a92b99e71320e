use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use reibun::corpus::CorpusIndex;

use crate::ui::theme::Theme;

/// Known context labels with their sentence counts.
pub struct ContextSidebar<'a> {
    index: &'a CorpusIndex,
    active_terms: &'a [&'a str],
    current: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> ContextSidebar<'a> {
    pub fn new(
        index: &'a CorpusIndex,
        active_terms: &'a [&'a str],
        current: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            index,
            active_terms,
            current,
            theme,
        }
    }
}

impl Widget for ContextSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" Contexts ({}) ", self.index.context_count()))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let lines: Vec<Line> = self
            .index
            .contexts()
            .take(inner.height as usize)
            .map(|label| {
                let count = self.index.ids_for(label).len();
                let marker = if self.current == Some(label) { "▸ " } else { "  " };
                let style = if self.active_terms.contains(&label) {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                let count_text = format!(" {count}");
                let budget = width.saturating_sub(marker.chars().count() + count_text.len());
                let shown: String = label.chars().take(budget).collect();
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(colors.accent())),
                    Span::styled(shown, style),
                    Span::styled(count_text, Style::default().fg(colors.text_dim())),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
