use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use reibun::session::{AnswerOption, Outcome, Presentation};

use crate::ui::theme::{Theme, ThemeColors};

pub struct AnswerPanel<'a> {
    presentation: &'a Presentation,
    answer: Option<&'a str>,
    outcome: Option<&'a Outcome>,
    theme: &'a Theme,
}

impl<'a> AnswerPanel<'a> {
    pub fn new(
        presentation: &'a Presentation,
        answer: Option<&'a str>,
        outcome: Option<&'a Outcome>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            presentation,
            answer,
            outcome,
            theme,
        }
    }

    /// Inner rows needed to show this question's answer area.
    pub fn rows(presentation: &Presentation) -> u16 {
        match presentation.options {
            Some(ref options) => options.len().max(1) as u16,
            None => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OptionState {
    Open,
    Correct,
    ChosenWrong,
    Inactive,
}

fn option_state(option: &AnswerOption, outcome: Option<&Outcome>) -> OptionState {
    match outcome {
        None => OptionState::Open,
        Some(_) if option.correct => OptionState::Correct,
        Some(o) if o.selected_id == option.sentence_id => OptionState::ChosenWrong,
        Some(_) => OptionState::Inactive,
    }
}

fn option_style(state: OptionState, colors: &ThemeColors) -> Style {
    match state {
        OptionState::Open => Style::default().fg(colors.fg()),
        OptionState::Correct => Style::default()
            .fg(colors.option_correct())
            .add_modifier(Modifier::BOLD),
        OptionState::ChosenWrong => Style::default()
            .fg(colors.option_incorrect())
            .add_modifier(Modifier::CROSSED_OUT),
        OptionState::Inactive => Style::default().fg(colors.text_dim()),
    }
}

impl Widget for AnswerPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let lines: Vec<Line> = match self.presentation.options {
            Some(ref options) => options
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    let state = option_state(option, self.outcome);
                    Line::from(vec![
                        Span::styled(
                            format!(" {}. ", i + 1),
                            Style::default().fg(colors.accent()),
                        ),
                        Span::styled(option.text.as_str(), option_style(state, colors)),
                    ])
                })
                .collect(),
            None => match self.answer {
                Some(answer) => vec![Line::from(Span::styled(
                    format!(" {answer}"),
                    Style::default().fg(colors.answer()),
                ))],
                None => vec![Line::from(Span::styled(
                    " ...",
                    Style::default().fg(colors.text_dim()).bg(colors.blinder()),
                ))],
            },
        };

        let title = match (&self.presentation.options, self.answer) {
            (Some(_), None) => " Choose ",
            (None, None) => " Answer (hidden) ",
            _ => " Answer ",
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if self.answer.is_some() {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
