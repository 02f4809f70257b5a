//! Decision types for URL filtering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision represents what the crawl pipeline should do with a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Keep the URL (fetch or index it)
    #[serde(alias = "allow", alias = "accept")]
    Keep,
    /// Discard the URL
    #[default]
    #[serde(alias = "deny", alias = "reject")]
    Discard,
}

impl Decision {
    /// Whether the URL survives the filter.
    pub fn is_keep(self) -> bool {
        self == Decision::Keep
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Keep => "keep",
            Decision::Discard => "discard",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw result of evaluating a URL against a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchDecision {
    /// The first applicable matching rule is an allow rule
    Allowed,
    /// The first applicable matching rule is a deny rule, or the length guard fired
    Denied,
    /// No rule matched
    NoRuleMatched,
}

impl MatchDecision {
    /// Collapse into a keep/discard decision, using `default` when no rule matched.
    pub fn resolve(self, default: Decision) -> Decision {
        match self {
            MatchDecision::Allowed => Decision::Keep,
            MatchDecision::Denied => Decision::Discard,
            MatchDecision::NoRuleMatched => default,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchDecision::Allowed => "allowed",
            MatchDecision::Denied => "denied",
            MatchDecision::NoRuleMatched => "no-rule-matched",
        }
    }
}

impl fmt::Display for MatchDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_config_names() {
        let parse = |s: &str| serde_yaml::from_str::<Decision>(s);
        assert_eq!(parse("keep").unwrap(), Decision::Keep);
        assert_eq!(parse("allow").unwrap(), Decision::Keep);
        assert_eq!(parse("deny").unwrap(), Decision::Discard);
        assert_eq!(parse("reject").unwrap(), Decision::Discard);
        assert!(parse("maybe").is_err());
    }

    #[test]
    fn test_decision_default_is_discard() {
        assert_eq!(Decision::default(), Decision::Discard);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(MatchDecision::Allowed.resolve(Decision::Discard), Decision::Keep);
        assert_eq!(MatchDecision::Denied.resolve(Decision::Keep), Decision::Discard);
        assert_eq!(
            MatchDecision::NoRuleMatched.resolve(Decision::Keep),
            Decision::Keep
        );
        assert_eq!(
            MatchDecision::NoRuleMatched.resolve(Decision::Discard),
            Decision::Discard
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Decision::Keep.to_string(), "keep");
        assert_eq!(MatchDecision::NoRuleMatched.to_string(), "no-rule-matched");
    }
}
