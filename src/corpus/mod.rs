pub mod index;

use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::{CorpusError, Result};

pub use index::{ALL_SOURCES, CorpusIndex};

/// Level assumed for sentences that don't carry one.
pub const DEFAULT_LEVEL: i32 = 5;

/// One entry of `data.json` exactly as it appears on disk.
#[derive(Clone, Debug, Deserialize)]
pub struct RawSentence {
    pub sentence: String,
    pub translation: String,
    #[serde(default)]
    pub contexts: Vec<String>,
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub attrurl: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CorpusFile {
    pub sentences: Vec<RawSentence>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentenceRecord {
    pub id: usize,
    /// Sentence text with inline `{n:payload}` / `{na:payload}` markup.
    pub text: String,
    pub translation: String,
    pub contexts: Vec<String>,
    pub audio_ref: String,
    pub attribution: Option<String>,
    pub attribution_url: Option<String>,
    pub level: Option<i32>,
}

impl SentenceRecord {
    pub fn level(&self) -> i32 {
        self.level.unwrap_or(DEFAULT_LEVEL)
    }

    pub fn has_context(&self, label: &str) -> bool {
        self.contexts.iter().any(|c| c == label)
    }
}

impl CorpusFile {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Assign ids by position and convert into records.
    pub fn into_records(self) -> Vec<SentenceRecord> {
        self.sentences
            .into_iter()
            .enumerate()
            .map(|(id, raw)| SentenceRecord {
                id,
                text: raw.sentence,
                translation: raw.translation,
                contexts: raw.contexts,
                audio_ref: raw.audio,
                attribution: raw.attribution,
                attribution_url: raw.attrurl,
                level: raw.level,
            })
            .collect()
    }
}

/// Load the corpus from a local path or an http(s) URL.
pub fn load_corpus(source: &str) -> Result<Vec<SentenceRecord>> {
    let json = if is_remote(source) {
        fetch_remote(source)?
    } else {
        let path = Path::new(source);
        fs::read_to_string(path).map_err(|e| CorpusError::Io {
            path: path.to_path_buf(),
            source: e,
        })?
    };

    let records = CorpusFile::parse(&json)?.into_records();
    info!("loaded {} sentences from {source}", records.len());
    Ok(records)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(feature = "network")]
fn fetch_remote(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| CorpusError::Network(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| CorpusError::Network(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(CorpusError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response
        .text()
        .map_err(|e| CorpusError::Network(e.to_string()))
}

#[cfg(not(feature = "network"))]
fn fetch_remote(url: &str) -> Result<String> {
    Err(CorpusError::NetworkDisabled(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "sentences": [
            {
                "sentence": "{1:犬}が{2:好き}です",
                "translation": "I like dogs.",
                "contexts": ["動物", "形容詞"],
                "audio": "0001.mp3",
                "attribution": "Tatoeba",
                "attrurl": "https://tatoeba.org/",
                "level": 3
            },
            {
                "sentence": "猫です",
                "translation": "It's a cat.",
                "contexts": ["動物"],
                "audio": "0002.mp3",
                "extra": "ignored"
            }
        ]
    }"#;

    #[test]
    fn test_parse_assigns_ids_by_position() {
        let records = CorpusFile::parse(SAMPLE).unwrap().into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[1].id, 1);
        assert_eq!(records[0].audio_ref, "0001.mp3");
        assert_eq!(records[0].attribution_url.as_deref(), Some("https://tatoeba.org/"));
    }

    #[test]
    fn test_missing_level_defaults_to_five() {
        let records = CorpusFile::parse(SAMPLE).unwrap().into_records();
        assert_eq!(records[0].level(), 3);
        assert_eq!(records[1].level(), DEFAULT_LEVEL);
        assert!(records[1].attribution.is_none());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = CorpusFile::parse("{\"sentences\": [").unwrap_err();
        assert!(matches!(err, CorpusError::Parse(_)));
    }

    #[test]
    fn test_load_corpus_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let records = load_corpus(file.path().to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].has_context("形容詞"));
    }

    #[test]
    fn test_load_corpus_missing_file() {
        let err = load_corpus("/nonexistent/reibun/data.json").unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
        assert!(err.to_string().contains("data.json"));
    }
}
