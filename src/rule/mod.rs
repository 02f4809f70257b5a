//! Rule model and matcher trait definitions.

mod literal;
mod regex_matcher;

pub(crate) use literal::fold_ascii_outliers;
pub use literal::{Anchor, FastMatcherFactory, LiteralMatcher};
pub use regex_matcher::{RegexMatcher, RegexMatcherFactory};

use std::fmt;

use crate::{MatchDecision, MatcherBackend, Result};

/// Polarity of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// `+`: keep URLs the rule matches
    Allow,
    /// `-`: discard URLs the rule matches
    Deny,
}

impl Sign {
    /// Parse a sign character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Sign::Allow),
            '-' => Some(Sign::Deny),
            _ => None,
        }
    }

    /// Get the sign character.
    pub fn as_char(self) -> char {
        match self {
            Sign::Allow => '+',
            Sign::Deny => '-',
        }
    }
}

/// Host or domain restriction of a rule.
///
/// A scope `example.org` covers `example.org` itself and every subdomain
/// such as `www.example.org`, but not `notexample.org`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope(String);

impl Scope {
    /// Parse a host name used as a scope prefix.
    ///
    /// Accepts ASCII letters, digits, `-` and `.`; requires at least one dot
    /// and no leading or trailing `.`/`-`. The result is lower-cased.
    pub fn parse(text: &str) -> Option<Self> {
        let valid = !text.is_empty()
            && text.contains('.')
            && text
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
            && !text.starts_with(['.', '-'])
            && !text.ends_with(['.', '-']);
        valid.then(|| Scope(text.to_ascii_lowercase()))
    }

    /// The scope host name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether a (lower-case) host equals the scope or is a subdomain of it.
    pub fn contains_host(&self, host: &str) -> bool {
        match host.strip_suffix(self.0.as_str()) {
            Some("") => true,
            Some(rest) => rest.ends_with('.'),
            None => false,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One signed, optionally scoped pattern from a rule source.
///
/// Rules are only produced by [`crate::RuleLoader`]. The ordinal is the
/// rule's position in the [`crate::RuleSet`] it belongs to (comments and
/// blank lines excluded); the line is its 1-based line number in the source
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    sign: Sign,
    pattern: String,
    scope: Option<Scope>,
    ordinal: usize,
    line: usize,
}

impl Rule {
    pub(crate) fn new(
        sign: Sign,
        pattern: impl Into<String>,
        scope: Option<Scope>,
        ordinal: usize,
        line: usize,
    ) -> Self {
        Self {
            sign,
            pattern: pattern.into(),
            scope,
            ordinal,
            line,
        }
    }

    /// Move the rule to another position.
    pub(crate) fn renumbered(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Polarity of this rule.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Pattern text as written in the source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Host/domain restriction, if any.
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// Declaration position, starting at 0.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// 1-based source line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// A scoped rule is skipped for hosts outside its scope.
    pub fn applies_to(&self, host: &str) -> bool {
        self.scope.as_ref().map_or(true, |s| s.contains_host(host))
    }

    /// Decision produced when this rule is the first match.
    pub fn decision(&self) -> MatchDecision {
        match self.sign {
            Sign::Allow => MatchDecision::Allowed,
            Sign::Deny => MatchDecision::Denied,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}{}:{}", self.sign.as_char(), scope, self.pattern),
            None => write!(f, "{}{}", self.sign.as_char(), self.pattern),
        }
    }
}

/// Matcher decides whether a URL satisfies one compiled rule pattern.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Return `true` if the pattern matches anywhere the pattern allows
    /// (unanchored unless the pattern itself is anchored).
    fn matches(&self, url: &str) -> bool;
}

/// MatcherFactory compiles rule patterns for one back-end.
pub trait MatcherFactory: Send + Sync {
    /// The back-end this factory compiles for.
    fn backend(&self) -> MatcherBackend;

    /// Compile the pattern of a rule.
    fn compile(&self, rule: &Rule) -> Result<Box<dyn Matcher>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_chars() {
        assert_eq!(Sign::from_char('+'), Some(Sign::Allow));
        assert_eq!(Sign::from_char('-'), Some(Sign::Deny));
        assert_eq!(Sign::from_char('*'), None);
        assert_eq!(Sign::Deny.as_char(), '-');
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!(Scope::parse("Example.ORG").unwrap().as_str(), "example.org");
        assert!(Scope::parse("localhost").is_none());
        assert!(Scope::parse("http").is_none());
        assert!(Scope::parse("^https").is_none());
        assert!(Scope::parse(".example.org").is_none());
        assert!(Scope::parse("example.org-").is_none());
        assert!(Scope::parse("").is_none());
    }

    #[test]
    fn test_scope_contains_host() {
        let scope = Scope::parse("example.org").unwrap();
        assert!(scope.contains_host("example.org"));
        assert!(scope.contains_host("www.example.org"));
        assert!(scope.contains_host("a.b.example.org"));
        assert!(!scope.contains_host("notexample.org"));
        assert!(!scope.contains_host("example.org.evil.com"));
        assert!(!scope.contains_host(""));
    }

    #[test]
    fn test_rule_applies_and_display() {
        let scoped = Rule::new(Sign::Allow, "", Scope::parse("example.org"), 0, 1);
        assert!(scoped.applies_to("www.example.org"));
        assert!(!scoped.applies_to("example.com"));
        assert_eq!(scoped.to_string(), "+example.org:");
        assert_eq!(scoped.decision(), MatchDecision::Allowed);

        let global = Rule::new(Sign::Deny, "wiki", None, 1, 2);
        assert!(global.applies_to("anything.net"));
        assert_eq!(global.to_string(), "-wiki");
        assert_eq!(global.decision(), MatchDecision::Denied);
    }
}
