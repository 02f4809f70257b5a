//! Error types for crawlrule.

use thiserror::Error;

/// Error type for crawlrule operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A rule line that is neither blank, a comment, nor a signed rule
    #[error("rule syntax error at line {line}: {text:?}")]
    RuleSyntax { line: usize, text: String },

    /// The regex back-end could not compile a pattern
    #[error("pattern compile error at line {line}: {message}")]
    PatternCompile { line: usize, message: String },

    /// The fast back-end was given a pattern outside its literal subset
    #[error("unsupported pattern at line {line}: {pattern:?} ({reason})")]
    UnsupportedPattern {
        line: usize,
        pattern: String,
        reason: String,
    },

    /// URL could not be decomposed into host/path/query
    #[error("malformed URL {url:?}: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for crawlrule operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Source line the error refers to, for construction-time errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::RuleSyntax { line, .. }
            | Error::PatternCompile { line, .. }
            | Error::UnsupportedPattern { line, .. } => Some(*line),
            _ => None,
        }
    }
}
