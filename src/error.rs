use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LodeError {
    #[error("invalid prefix-url pair (expected `acronym:url`): {0}")]
    #[diagnostic(help("try `--prefix-url cito:http://purl.org/spar/cito`"))]
    InvalidPrefixUrl(String),

    #[error("invalid acronym: {0:?}")]
    InvalidAcronym(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid string-replace rule (expected `pattern->replacement`): {0}")]
    InvalidReplaceRule(String),

    #[error("invalid regular expression {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("LODE request failed: {0}")]
    LodeHttp(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
