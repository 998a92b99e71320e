use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use reibun::engine::HighlightedSentence;
use reibun::session::Presentation;

use crate::ui::theme::{Theme, ThemeColors};

/// The example sentence with its grammar focus emphasized.
pub struct SentenceCard<'a> {
    presentation: &'a Presentation,
    shown: bool,
    revealed: bool,
    theme: &'a Theme,
}

impl<'a> SentenceCard<'a> {
    pub fn new(presentation: &'a Presentation, shown: bool, revealed: bool, theme: &'a Theme) -> Self {
        Self {
            presentation,
            shown,
            revealed,
            theme,
        }
    }
}

/// One span per segment; emphasized segments get the highlight style.
fn sentence_line<'s>(sentence: &'s HighlightedSentence, colors: &ThemeColors) -> Line<'s> {
    let plain = Style::default().fg(colors.fg());
    let emphasis = Style::default()
        .fg(colors.highlight())
        .bg(colors.highlight_bg())
        .add_modifier(Modifier::BOLD);
    let spans: Vec<Span> = sentence
        .segments
        .iter()
        .map(|segment| {
            let style = if segment.is_emphasized() { emphasis } else { plain };
            Span::styled(segment.text.as_str(), style)
        })
        .collect();
    Line::from(spans)
}

impl Widget for SentenceCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        // The focus label would give the answer away before reveal.
        if self.revealed {
            if let Some(ref context) = self.presentation.context {
                block = block.title(Span::styled(
                    format!(" {context} "),
                    Style::default().fg(colors.accent()),
                ));
            }
        }
        if let Some(ref attribution) = self.presentation.attribution {
            block = block.title_bottom(
                Line::from(Span::styled(
                    format!(" {attribution} "),
                    Style::default().fg(colors.text_dim()),
                ))
                .right_aligned(),
            );
        }

        let lines = if self.shown {
            vec![Line::from(""), sentence_line(&self.presentation.sentence, colors)]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "[Tab] Show sentence",
                    Style::default().fg(colors.text_dim()),
                )),
            ]
        };

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reibun::engine::highlight;

    #[test]
    fn test_sentence_line_styles_emphasis() {
        let contexts = vec!["動物".to_string(), "形容詞".to_string()];
        let sentence = highlight("{1:犬}が{2:好き}です", &contexts, 0);
        let colors = ThemeColors::default();
        let line = sentence_line(&sentence, &colors);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "犬");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[1].content, "が好きです");
        assert!(!line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }
}
