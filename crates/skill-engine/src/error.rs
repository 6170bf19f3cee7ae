//! Error types for skill-engine operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::resolver::Tier;

/// Why a frontmatter block could not be extracted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterError {
    #[error("document does not start with a `---` frontmatter line")]
    Missing,

    #[error("frontmatter is not closed by a `---` line")]
    Unterminated,
}

/// Why a single record file could not be loaded.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),

    #[error("TOON error: {0}")]
    Toon(#[from] toon_codec::ToonError),

    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),
}

impl RecordError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecordError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a tier file could not be located.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown record `{0}`")]
    UnknownRecord(String),

    #[error("no {tier} file for `{record}` (tried {})", .probed.join(", "))]
    RecordNotFound {
        record: String,
        tier: Tier,
        probed: Vec<String>,
    },
}

/// Why a prompt could not be assembled for a query.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("no matching record for `{0}`")]
    NoMatch(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why an engine configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T, E = RecordError> = std::result::Result<T, E>;
