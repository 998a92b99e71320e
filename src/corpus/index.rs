use indexmap::{IndexMap, IndexSet};

use crate::corpus::SentenceRecord;

/// Sentinel source entry meaning "no source filter".
pub const ALL_SOURCES: &str = "All";

/// Context buckets and attribution sources derived from the corpus.
/// Both preserve first-seen order.
#[derive(Clone, Debug, Default)]
pub struct CorpusIndex {
    context_to_ids: IndexMap<String, Vec<usize>>,
    sources: IndexSet<String>,
}

impl CorpusIndex {
    pub fn build(sentences: &[SentenceRecord]) -> Self {
        let mut context_to_ids: IndexMap<String, Vec<usize>> = IndexMap::new();
        let mut sources = IndexSet::new();
        sources.insert(ALL_SOURCES.to_string());

        for sentence in sentences {
            for context in &sentence.contexts {
                let bucket = context_to_ids.entry(context.clone()).or_default();
                // A sentence listing the same context twice still appears once.
                if bucket.last() != Some(&sentence.id) {
                    bucket.push(sentence.id);
                }
            }
            if let Some(ref attribution) = sentence.attribution {
                sources.insert(attribution.clone());
            }
        }

        Self {
            context_to_ids,
            sources,
        }
    }

    /// Ids of sentences tagged with `label`. Unknown labels yield an empty slice.
    pub fn ids_for(&self, label: &str) -> &[usize] {
        self.context_to_ids
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.context_to_ids.keys().map(String::as_str)
    }

    pub fn context_count(&self) -> usize {
        self.context_to_ids.len()
    }

    /// Distinct attributions, starting with [`ALL_SOURCES`].
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    pub fn source_list(&self) -> Vec<String> {
        self.sources.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: usize, contexts: &[&str], attribution: Option<&str>) -> SentenceRecord {
        SentenceRecord {
            id,
            text: format!("sentence {id}"),
            translation: format!("translation {id}"),
            contexts: contexts.iter().map(|c| c.to_string()).collect(),
            audio_ref: format!("{id}.mp3"),
            attribution: attribution.map(str::to_string),
            attribution_url: None,
            level: None,
        }
    }

    #[test]
    fn test_buckets_preserve_corpus_order() {
        let sentences = vec![
            record(0, &["A"], None),
            record(1, &["A", "B"], None),
            record(2, &["B"], None),
            record(3, &["A"], None),
        ];
        let index = CorpusIndex::build(&sentences);
        assert_eq!(index.ids_for("A"), &[0, 1, 3]);
        assert_eq!(index.ids_for("B"), &[1, 2]);
        assert_eq!(index.contexts().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_unknown_context_is_empty() {
        let index = CorpusIndex::build(&[record(0, &["A"], None)]);
        assert!(index.ids_for("missing").is_empty());
    }

    #[test]
    fn test_sentence_without_contexts_is_unreachable() {
        let index = CorpusIndex::build(&[record(0, &[], None), record(1, &["A"], None)]);
        assert_eq!(index.context_count(), 1);
        assert_eq!(index.ids_for("A"), &[1]);
    }

    #[test]
    fn test_duplicate_context_on_one_sentence_not_repeated() {
        let index = CorpusIndex::build(&[record(0, &["A", "A"], None)]);
        assert_eq!(index.ids_for("A"), &[0]);
    }

    #[test]
    fn test_sources_start_with_all_in_first_seen_order() {
        let sentences = vec![
            record(0, &["A"], Some("Tatoeba")),
            record(1, &["A"], None),
            record(2, &["A"], Some("Textbook")),
            record(3, &["A"], Some("Tatoeba")),
        ];
        let index = CorpusIndex::build(&sentences);
        assert_eq!(
            index.sources().collect::<Vec<_>>(),
            vec![ALL_SOURCES, "Tatoeba", "Textbook"]
        );
    }
}
