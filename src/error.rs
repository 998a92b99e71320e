use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain or parse the sentence corpus. Always fatal to startup.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus request to {url} failed with status {status}")]
    Http { url: String, status: u16 },

    #[error("corpus request failed: {0}")]
    Network(String),

    #[error("corpus {0} is remote but this build has no network support")]
    NetworkDisabled(String),

    #[error("malformed corpus data: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
