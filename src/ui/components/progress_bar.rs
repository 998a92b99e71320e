use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use reibun::engine::QuestionPool;

use crate::ui::theme::Theme;

/// How far through the current shuffle the session has drawn.
pub struct PoolProgress<'a> {
    drawn: usize,
    total: usize,
    ratio: f64,
    epoch: u64,
    theme: &'a Theme,
}

impl<'a> PoolProgress<'a> {
    pub fn new(pool: &QuestionPool, theme: &'a Theme) -> Self {
        Self {
            drawn: pool.epoch_size().saturating_sub(pool.remaining()),
            total: pool.epoch_size(),
            ratio: pool.progress().clamp(0.0, 1.0),
            epoch: pool.epoch(),
            theme,
        }
    }

    fn label(&self) -> String {
        format!("{}/{}", self.drawn, self.total)
    }
}

impl Widget for PoolProgress<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Round {} ", self.epoch.max(1)))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label = self.label();
        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
