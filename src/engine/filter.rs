use crate::corpus::{ALL_SOURCES, DEFAULT_LEVEL, SentenceRecord};

/// Session-scoped question filter. Any change invalidates the question pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    /// Comma-separated context labels, matched exactly against each sentence's contexts.
    pub text: Option<String>,
    /// Either [`ALL_SOURCES`] or an exact attribution.
    pub source: String,
    /// Minimum sentence level.
    pub min_level: i32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            text: None,
            source: ALL_SOURCES.to_string(),
            min_level: DEFAULT_LEVEL,
        }
    }
}

impl FilterState {
    /// Tokens of the text filter. Empty when the filter is unset or blank.
    pub fn terms(&self) -> Vec<&str> {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text.split(',').collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the user narrowed the pool in any way.
    pub fn is_filtered(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty()) || self.source != ALL_SOURCES
    }

    pub fn matches(&self, sentence: &SentenceRecord) -> bool {
        let terms = self.terms();
        if !terms.is_empty() && !terms.iter().any(|term| sentence.has_context(term)) {
            return false;
        }

        if self.source != ALL_SOURCES && sentence.attribution.as_deref() != Some(&self.source) {
            return false;
        }

        sentence.level() >= self.min_level
    }
}
