use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    /// The text changed; callers debounce on this.
    Edited,
    Submit,
    Cancel,
}

/// Single-line editor for the comma-separated context filter.
///
/// Tab completes the term under the cursor against known context labels.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    candidates: Vec<String>,
    completions: Vec<String>,
    completion_index: Option<usize>,
    /// Text before the term being completed, snapshot on first Tab.
    completion_prefix: String,
}

impl LineInput {
    pub fn new(text: &str, candidates: Vec<String>) -> Self {
        let cursor = text.chars().count();
        Self {
            text: text.to_string(),
            cursor,
            candidates,
            completions: Vec::new(),
            completion_index: None,
            completion_prefix: String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            None => (&self.text, None, ""),
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let before = self.text.clone();
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,

            KeyCode::Left => {
                self.reset_completion();
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.reset_completion();
                self.cursor = (self.cursor + 1).min(self.text.chars().count());
            }
            KeyCode::Home => {
                self.reset_completion();
                self.cursor = 0;
            }
            KeyCode::End => {
                self.reset_completion();
                self.cursor = self.text.chars().count();
            }
            KeyCode::Backspace => {
                self.reset_completion();
                if self.cursor > 0 {
                    self.remove_char_at(self.cursor - 1);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                self.reset_completion();
                if self.cursor < self.text.chars().count() {
                    self.remove_char_at(self.cursor);
                }
            }
            KeyCode::Tab => self.tab_complete(true),
            KeyCode::BackTab => self.tab_complete(false),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        if self.text != before {
            InputResult::Edited
        } else {
            InputResult::Continue
        }
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_char_at(&mut self, char_idx: usize) {
        let start = self.char_to_byte(char_idx);
        let end = self.char_to_byte(char_idx + 1);
        self.text.replace_range(start..end, "");
    }

    fn reset_completion(&mut self) {
        self.completions.clear();
        self.completion_index = None;
        self.completion_prefix.clear();
    }

    fn tab_complete(&mut self, forward: bool) {
        // Only complete the last term, with the cursor at the end.
        if self.cursor < self.text.chars().count() {
            return;
        }

        match self.completion_index {
            None => {
                let (prefix, partial) = match self.text.rfind(',') {
                    Some(pos) => (&self.text[..=pos], &self.text[pos + 1..]),
                    None => ("", self.text.as_str()),
                };
                self.completions = self
                    .candidates
                    .iter()
                    .filter(|c| c.starts_with(partial))
                    .cloned()
                    .collect();
                if self.completions.is_empty() {
                    return;
                }
                self.completion_prefix = prefix.to_string();
                self.completion_index = Some(0);
                self.apply_completion(0);
            }
            Some(idx) => {
                let count = self.completions.len();
                let next = if forward {
                    (idx + 1) % count
                } else {
                    (idx + count - 1) % count
                };
                self.completion_index = Some(next);
                self.apply_completion(next);
            }
        }
    }

    fn apply_completion(&mut self, idx: usize) {
        self.text = format!("{}{}", self.completion_prefix, self.completions[idx]);
        self.cursor = self.text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn labels() -> Vec<String> {
        ["て形", "てもいい", "名詞", "〜ば〜ほど"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_typing_reports_edits() {
        let mut input = LineInput::new("", labels());
        assert_eq!(input.handle(key(KeyCode::Char('名'))), InputResult::Edited);
        assert_eq!(input.handle(key(KeyCode::Left)), InputResult::Continue);
        assert_eq!(input.value(), "名");
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut input = LineInput::new("名詞", labels());
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "名");
        assert_eq!(input.render_parts(), ("名", None, ""));
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = LineInput::new("AC", Vec::new());
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Char('B')));
        assert_eq!(input.value(), "ABC");
        assert_eq!(input.render_parts(), ("AB", Some('C'), ""));
    }

    #[test]
    fn test_tab_completes_last_term_and_cycles() {
        let mut input = LineInput::new("名詞,て", labels());
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "名詞,て形");
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "名詞,てもいい");
        input.handle(key(KeyCode::BackTab));
        assert_eq!(input.value(), "名詞,て形");
    }

    #[test]
    fn test_tab_without_match_is_noop() {
        let mut input = LineInput::new("xyz", labels());
        assert_eq!(input.handle(key(KeyCode::Tab)), InputResult::Continue);
        assert_eq!(input.value(), "xyz");
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = LineInput::new("名詞", labels());
        let result = input.handle(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(result, InputResult::Edited);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut input = LineInput::new("", labels());
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }
}
