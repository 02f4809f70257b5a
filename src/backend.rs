//! Matcher back-end selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// MatcherBackend selects how rule patterns are compiled and evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherBackend {
    /// General regular expressions, evaluated rule by rule
    #[default]
    Regex,
    /// Restricted literal subset, evaluated through combined search structures
    Fast,
}

impl MatcherBackend {
    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatcherBackend::Regex => "regex",
            MatcherBackend::Fast => "fast",
        }
    }
}

impl fmt::Display for MatcherBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
