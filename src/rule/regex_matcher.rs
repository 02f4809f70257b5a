//! Regular-expression matcher back-end.

use regex::{Regex, RegexBuilder};

use super::{Matcher, MatcherFactory, Rule};
use crate::error::{Error, Result};
use crate::MatcherBackend;

/// RegexMatcher reports whether a pattern occurs anywhere in a URL.
///
/// Matching is unanchored and case-sensitive; rule authors anchor with
/// `^`/`$` and switch case folding with inline flags such as `(?i)`.
///
/// # Examples
/// ```
/// use crawlrule::rule::{Matcher, RegexMatcher};
///
/// let matcher = RegexMatcher::new(r"\.rss$", false).unwrap();
/// assert!(matcher.matches("http://example.com/data.rss"));
/// assert!(!matcher.matches("http://example.com/data.rss/baz"));
/// ```
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Compile a pattern.
    ///
    /// `dot_matches_new_line` makes `.` match `\n` as well.
    pub fn new(pattern: &str, dot_matches_new_line: bool) -> std::result::Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .dot_matches_new_line(dot_matches_new_line)
            .build()?;
        Ok(Self { regex })
    }

    /// The compiled pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Matcher for RegexMatcher {
    fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}

/// Factory for the general regex back-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexMatcherFactory {
    dot_matches_new_line: bool,
}

impl RegexMatcherFactory {
    /// Create a factory with default engine options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether `.` matches newlines in compiled patterns.
    pub fn dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }
}

impl MatcherFactory for RegexMatcherFactory {
    fn backend(&self) -> MatcherBackend {
        MatcherBackend::Regex
    }

    fn compile(&self, rule: &Rule) -> Result<Box<dyn Matcher>> {
        let matcher = RegexMatcher::new(rule.pattern(), self.dot_matches_new_line).map_err(
            |e| Error::PatternCompile {
                line: rule.line(),
                message: e.to_string(),
            },
        )?;
        Ok(Box::new(matcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Sign;

    #[test]
    fn test_unanchored_match() {
        let m = RegexMatcher::new("wiki", false).unwrap();
        assert!(m.matches("https://en.wikipedia.org/wiki/Apache_Nutch"));
        assert!(!m.matches("https://example.gov/baz.xml"));
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let m = RegexMatcher::new("allDatasets", false).unwrap();
        assert!(m.matches("https://example.gov/errdap/allDatasets.html"));
        assert!(!m.matches("https://example.gov/errdap/alldatasets.html/"));

        let m = RegexMatcher::new("(?i)allDatasets", false).unwrap();
        assert!(m.matches("https://example.gov/errdap/alldatasets.html/"));
    }

    #[test]
    fn test_suffix_anchor() {
        let m = RegexMatcher::new(r"\.rss$", false).unwrap();
        assert!(m.matches("data.rss"));
        assert!(!m.matches("datarss"));
        assert!(!m.matches("data.rss/baz"));
        assert!(!m.matches("test_rss_feed"));
    }

    #[test]
    fn test_dot_matches_new_line() {
        let plain = RegexMatcher::new("a.b", false).unwrap();
        let dotall = RegexMatcher::new("a.b", true).unwrap();
        assert!(!plain.matches("a\nb"));
        assert!(dotall.matches("a\nb"));
    }

    #[test]
    fn test_factory_compile_error_carries_line() {
        let rule = Rule::new(Sign::Deny, "foo(", None, 0, 7);
        let err = RegexMatcherFactory::new().compile(&rule).unwrap_err();
        match err {
            Error::PatternCompile { line, message } => {
                assert_eq!(line, 7);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
