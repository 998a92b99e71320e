use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: quiz + context sidebar
    Medium, // 60-99 cols: quiz only, progress bar
    Narrow, // <60 cols: quiz only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_progress_bar(&self, height: u16) -> bool {
        height >= 20 && *self != LayoutTier::Narrow
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct QuizLayout {
    pub header: Rect,
    pub sentence: Rect,
    pub answer: Rect,
    pub progress: Option<Rect>,
    pub filter: Option<Rect>,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl QuizLayout {
    /// `answer_rows` is the inner height the answer panel needs.
    pub fn new(area: Rect, answer_rows: u16, show_filter: bool) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        let (main, sidebar) = if tier.show_sidebar() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
                .split(vertical[1]);
            (horizontal[0], Some(horizontal[1]))
        } else {
            (vertical[1], None)
        };

        let show_progress = tier.show_progress_bar(area.height);
        let mut constraints = vec![
            Constraint::Min(5),
            Constraint::Length(answer_rows.saturating_add(2)),
        ];
        if show_progress {
            constraints.push(Constraint::Length(3));
        }
        if show_filter {
            constraints.push(Constraint::Length(3));
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(main);

        let mut idx = 2;
        let progress = show_progress.then(|| {
            idx += 1;
            rows[idx - 1]
        });
        let filter = show_filter.then(|| rows[idx]);

        Self {
            header: vertical[0],
            sentence: rows[0],
            answer: rows[1],
            progress,
            filter,
            sidebar,
            footer: vertical[2],
            tier,
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 9;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 120, 40)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 80, 40)), LayoutTier::Medium);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 40, 40)), LayoutTier::Narrow);
    }

    #[test]
    fn test_quiz_layout_optional_rows() {
        let layout = QuizLayout::new(Rect::new(0, 0, 120, 40), 4, true);
        assert!(layout.sidebar.is_some());
        assert!(layout.progress.is_some());
        let filter = layout.filter.unwrap();
        assert_eq!(filter.height, 3);
        assert_eq!(layout.answer.height, 6);

        let narrow = QuizLayout::new(Rect::new(0, 0, 50, 15), 1, false);
        assert!(narrow.sidebar.is_none());
        assert!(narrow.progress.is_none());
        assert!(narrow.filter.is_none());
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[Enter] Next", "[Space] Audio", "[q] Quit"], 28);
        assert_eq!(lines, vec![" [Enter] Next  [Space] Audio", " [q] Quit"]);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 5);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, Rect::new(0, 0, 30, 5));
    }
}
