//! Filter configuration types.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::{Decision, MatcherBackend};

/// Length thresholds checked before any rule is evaluated.
///
/// `None` means no limit for that dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthLimits {
    /// Maximum length of the whole URL
    #[serde(default)]
    pub max_url_length: Option<usize>,
    /// Maximum length of the URL path
    #[serde(default)]
    pub max_path_length: Option<usize>,
    /// Maximum length of the URL query (without `?`)
    #[serde(default)]
    pub max_query_length: Option<usize>,
}

impl LengthLimits {
    /// No limits at all.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Check that every configured limit is positive.
    pub fn validate(&self) -> Result<()> {
        for (name, limit) in [
            ("max_url_length", self.max_url_length),
            ("max_path_length", self.max_path_length),
            ("max_query_length", self.max_query_length),
        ] {
            if limit == Some(0) {
                return Err(Error::Config(format!("{name} must be positive")));
            }
        }
        Ok(())
    }
}

/// Where rule text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// Inline rule text
    Inline(String),
    /// A rule file on disk
    File(PathBuf),
    /// No rules configured
    None,
}

impl RuleSource {
    /// Open the source for line-wise reading.
    ///
    /// Returns `None` when no source is configured.
    pub fn open(&self) -> Result<Option<Box<dyn BufRead>>> {
        match self {
            RuleSource::Inline(text) => Ok(Some(Box::new(Cursor::new(text.clone().into_bytes())))),
            RuleSource::File(path) => {
                let file = File::open(path)?;
                Ok(Some(Box::new(BufReader::new(file))))
            }
            RuleSource::None => Ok(None),
        }
    }

    /// Short description for log output.
    pub fn describe(&self) -> String {
        match self {
            RuleSource::Inline(_) => "inline rules".to_string(),
            RuleSource::File(path) => format!("rules file {:?}", path),
            RuleSource::None => "no rules".to_string(),
        }
    }
}

/// Configuration for a [`crate::UrlFilter`].
///
/// # Example
/// ```
/// use crawlrule::{Decision, FilterConfig, MatcherBackend};
///
/// let config = FilterConfig::from_yaml(r#"
/// rules: |
///   -\.rss$
///   +.
/// backend: fast
/// max_url_length: 2048
/// "#).unwrap();
/// assert_eq!(config.backend, MatcherBackend::Fast);
/// assert_eq!(config.default_decision, Decision::Discard);
/// assert_eq!(config.limits.max_url_length, Some(2048));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Inline rule text; takes precedence over `rules_file`
    pub rules: Option<String>,
    /// Path to a rule file
    pub rules_file: Option<PathBuf>,
    /// Length guard thresholds
    #[serde(flatten)]
    pub limits: LengthLimits,
    /// Matcher back-end
    pub backend: MatcherBackend,
    /// Decision when no rule matches
    pub default_decision: Decision,
    /// Make `.` match newlines in the regex back-end
    pub dot_matches_new_line: bool,
}

impl FilterConfig {
    /// Create a configuration with inline rules and defaults elsewhere.
    pub fn with_rules(rules: impl Into<String>) -> Self {
        Self {
            rules: Some(rules.into()),
            ..Self::default()
        }
    }

    /// Parse a configuration from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.limits.validate()?;
        Ok(config)
    }

    /// Set the matcher back-end.
    pub fn backend(mut self, backend: MatcherBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the default decision for URLs no rule matches.
    pub fn default_decision(mut self, decision: Decision) -> Self {
        self.default_decision = decision;
        self
    }

    /// Set the length guard thresholds.
    pub fn limits(mut self, limits: LengthLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolve the rule source; inline text wins over a file.
    pub fn rule_source(&self) -> RuleSource {
        match (&self.rules, &self.rules_file) {
            (Some(text), _) => RuleSource::Inline(text.clone()),
            (None, Some(path)) => RuleSource::File(path.clone()),
            (None, None) => RuleSource::None,
        }
    }
}
