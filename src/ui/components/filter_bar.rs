use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use reibun::engine::FilterState;

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Context filter, source and minimum level. Shows the live editor while editing.
pub struct FilterBar<'a> {
    filter: &'a FilterState,
    input: Option<&'a LineInput>,
    pending: bool,
    theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn new(
        filter: &'a FilterState,
        input: Option<&'a LineInput>,
        pending: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            filter,
            input,
            pending,
            theme,
        }
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.text_dim());
        let value = Style::default().fg(colors.fg());

        let mut spans = vec![Span::styled(" Contexts: ", label)];
        match self.input {
            Some(input) => {
                let (before, cursor, after) = input.render_parts();
                let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
                spans.push(Span::styled(before, value));
                match cursor {
                    Some(ch) => {
                        spans.push(Span::styled(ch.to_string(), cursor_style));
                        spans.push(Span::styled(after, value));
                    }
                    None => spans.push(Span::styled(" ", cursor_style)),
                }
            }
            None => match self.filter.text.as_deref() {
                Some(text) if !text.trim().is_empty() => {
                    spans.push(Span::styled(text, Style::default().fg(colors.accent())))
                }
                _ => spans.push(Span::styled("(any)", label)),
            },
        }
        if self.pending {
            spans.push(Span::styled(" …", Style::default().fg(colors.warning())));
        }
        spans.push(Span::styled("   Source: ", label));
        spans.push(Span::styled(self.filter.source.as_str(), value));
        spans.push(Span::styled("   Level ≥ ", label));
        spans.push(Span::styled(self.filter.min_level.to_string(), value));

        let border = if self.input.is_some() {
            colors.border_focused()
        } else {
            colors.border()
        };
        Paragraph::new(Line::from(spans))
            .block(
                Block::bordered()
                    .title(" Filter ")
                    .border_style(Style::default().fg(border)),
            )
            .render(area, buf);
    }
}
