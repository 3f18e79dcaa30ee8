use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("ERROR: Could not read question bank `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ERROR: Invalid question bank: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("ERROR: Question #{index} is missing an id")]
    MissingId { index: usize },
    #[error("ERROR: Duplicate question id `{id}`")]
    DuplicateId { id: String },
}

/// A question that was left out of the bank, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub file: Option<PathBuf>,
    pub question: String,
    pub message: String,
}
