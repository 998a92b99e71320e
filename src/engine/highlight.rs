use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Separator between the parts of a composite context label, e.g. `〜ば〜ほど`.
pub const COMPOSITE_SEPARATOR: char = '〜';

static MARKUP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+[a-z]?):([^}]+)\}").expect("valid markup regex"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// Markup key of the token this segment came from, when emphasized.
    pub emphasis: Option<String>,
}

impl Segment {
    pub fn is_emphasized(&self) -> bool {
        self.emphasis.is_some()
    }
}

/// A sentence with markup resolved against one chosen context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightedSentence {
    pub segments: Vec<Segment>,
}

impl HighlightedSentence {
    /// Text with all markup stripped.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Keys of the emphasized spans, in sentence order.
    pub fn emphasis_keys(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| s.emphasis.as_deref())
            .collect()
    }

    pub fn has_emphasis(&self) -> bool {
        self.segments.iter().any(Segment::is_emphasized)
    }

    fn push_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.emphasis.is_none() => last.text.push_str(text),
            _ => self.segments.push(Segment {
                text: text.to_string(),
                emphasis: None,
            }),
        }
    }
}

/// Markup keys belonging to `contexts[target]`: `"n"` for a simple context,
/// `"na"`, `"nb"`, ... for a composite one (n is 1-based).
pub fn context_keys(contexts: &[String], target: usize) -> Vec<String> {
    let Some(context) = contexts.get(target) else {
        return Vec::new();
    };
    let slot = target + 1;
    let part_count = context.split(COMPOSITE_SEPARATOR).count();
    if part_count > 1 {
        (0..part_count)
            .map(|i| format!("{slot}{}", letter(i)))
            .collect()
    } else {
        vec![slot.to_string()]
    }
}

fn letter(i: usize) -> char {
    // Composite contexts never get near 26 parts; clamp rather than wrap.
    (b'a' + i.min(25) as u8) as char
}

/// Resolve markup in `text`, emphasizing only tokens of `contexts[target]`.
/// Tokens of other contexts, or with unknown keys, keep their text unemphasized.
pub fn highlight(text: &str, contexts: &[String], target: usize) -> HighlightedSentence {
    let keys: HashSet<String> = context_keys(contexts, target).into_iter().collect();
    let mut out = HighlightedSentence::default();
    let mut last_end = 0;

    for caps in MARKUP_TOKEN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_plain(&text[last_end..whole.start()]);

        let key = &caps[1];
        let payload = &caps[2];
        if keys.contains(key) {
            out.segments.push(Segment {
                text: payload.to_string(),
                emphasis: Some(key.to_string()),
            });
        } else {
            out.push_plain(payload);
        }
        last_end = whole.end();
    }
    out.push_plain(&text[last_end..]);
    out
}
