//! Error types shared by every stage of a poll cycle.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Config file could not be read
    #[error("failed to read config {}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    /// Config file is not valid toml for our schema
    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),

    /// Config values parsed but make no sense
    #[error("invalid config: {0}")]
    Config(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Http { url: String, source: reqwest::Error },

    #[error("ranking at {url} returned no ids")]
    EmptyRanking { url: String },

    #[error("i/o error on {}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed json in {}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("failed to copy static assets")]
    Walk(#[from] walkdir::Error),

    #[error("no samples in the current window")]
    NoSamples,

    #[error("archive is empty, nothing to publish")]
    EmptyArchive,

    #[error("staging directory {} already exists", .0.display())]
    StageExists(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Json { path: path.into(), source }
    }

    /// Display form followed by every underlying cause, one per line.
    /// Display strings never repeat their source, so each cause shows once.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str("\n  caused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}
