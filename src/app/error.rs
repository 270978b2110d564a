use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EksiError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTML parsing error: {0}")]
    Parse(String),

    #[error("Failed to write cache file at {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid search term: {0:?}")]
    InvalidTerm(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl EksiError {
    /// True for failures caused by the upstream site rather than this host.
    pub fn is_upstream(&self) -> bool {
        matches!(self, EksiError::Fetch(_) | EksiError::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, EksiError>;
