//! Literal pattern subset used by the fast back-end.
//!
//! A supported pattern is an optional `(?i)` marker, an optional `^`, a
//! literal body and an optional trailing `$`. Regex metacharacters in the
//! body must be escaped with a backslash. Every supported pattern is also a
//! regular expression with the same meaning, which lets the regex back-end
//! serve as a reference for the fast one.

use std::borrow::Cow;

use super::{Matcher, MatcherFactory, Rule};
use crate::error::{Error, Result};
use crate::MatcherBackend;

/// Characters with a special meaning in a regular expression.
const METACHARS: &[char] = &['.', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '^', '$', '\\'];

/// Characters that stand for themselves after a backslash.
const ESCAPABLE: &[char] = &[
    '.', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '^', '$', '\\', '/', '-', ':', '#',
    '&', '~', '%', '=', ',', ';', '!', '@',
];

/// Case-insensitive marker accepted at the start of a pattern.
const CASE_INSENSITIVE_MARKER: &str = "(?i)";

/// Non-ASCII characters whose simple case folding is an ASCII letter:
/// KELVIN SIGN folds to `k`, LATIN SMALL LETTER LONG S folds to `s`.
const ASCII_FOLDING_OUTLIERS: [char; 2] = ['\u{212A}', '\u{017F}'];

/// Replace the characters that fold onto ASCII letters with those letters.
///
/// After this, ASCII case-insensitive comparison against an ASCII literal
/// gives the same answer as the regex engine's Unicode-aware `(?i)`.
pub(crate) fn fold_ascii_outliers(url: &str) -> Cow<'_, str> {
    if url.is_ascii() || !url.contains(ASCII_FOLDING_OUTLIERS) {
        return Cow::Borrowed(url);
    }
    Cow::Owned(
        url.chars()
            .map(|c| match c {
                '\u{212A}' => 'k',
                '\u{017F}' => 's',
                c => c,
            })
            .collect(),
    )
}

/// Where a literal must occur in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Anywhere (`literal`)
    Substring,
    /// At the start (`^literal`)
    Prefix,
    /// At the end (`literal$`)
    Suffix,
    /// The whole URL (`^literal$`)
    Exact,
}

/// LiteralMatcher matches one pattern of the fast subset on its own.
///
/// The combined [`crate::fast::FastMatcher`] answers the same question for
/// all rules at once; this type is the per-rule form used for validation and
/// for linear evaluation.
///
/// A `(?i)` literal must be ASCII. It then matches any URL text that the
/// regex engine's `(?i)` would match, including the KELVIN SIGN for `k` and
/// the LONG S for `s`.
///
/// # Examples
/// ```
/// use crawlrule::rule::{Anchor, LiteralMatcher, Matcher};
///
/// let m = LiteralMatcher::parse(r"\.rss$").unwrap();
/// assert_eq!(m.anchor(), Anchor::Suffix);
/// assert_eq!(m.literal(), ".rss");
/// assert!(m.matches("http://example.com/feed.rss"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralMatcher {
    literal: String,
    anchor: Anchor,
    case_insensitive: bool,
}

impl LiteralMatcher {
    /// Parse a pattern, returning the reason it falls outside the subset on failure.
    pub fn parse(pattern: &str) -> std::result::Result<Self, String> {
        let (case_insensitive, rest) = match pattern.strip_prefix(CASE_INSENSITIVE_MARKER) {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let (prefix, rest) = match rest.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };

        let mut literal = String::with_capacity(rest.len());
        let mut suffix = false;
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(e) if ESCAPABLE.contains(&e) => literal.push(e),
                    Some(e) => return Err(format!("escape sequence \\{e} is not a literal")),
                    None => return Err("dangling backslash".to_string()),
                },
                '$' if chars.peek().is_none() => suffix = true,
                c if METACHARS.contains(&c) => {
                    return Err(format!("metacharacter {c:?} must be escaped"));
                }
                c => literal.push(c),
            }
        }

        if case_insensitive && !literal.is_ascii() {
            return Err("case-insensitive literal must be ASCII".to_string());
        }

        let anchor = match (prefix, suffix) {
            (false, false) => Anchor::Substring,
            (true, false) => Anchor::Prefix,
            (false, true) => Anchor::Suffix,
            (true, true) => Anchor::Exact,
        };

        Ok(Self {
            literal,
            anchor,
            case_insensitive,
        })
    }

    /// The unescaped literal text.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Anchor class of the pattern.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Whether ASCII letters compare case-insensitively.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn eq_bytes(&self, a: &[u8], b: &[u8]) -> bool {
        if self.case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

impl Matcher for LiteralMatcher {
    fn matches(&self, url: &str) -> bool {
        let folded;
        let url = if self.case_insensitive {
            folded = fold_ascii_outliers(url);
            folded.as_bytes()
        } else {
            url.as_bytes()
        };
        let lit = self.literal.as_bytes();
        if url.len() < lit.len() {
            return false;
        }
        match self.anchor {
            Anchor::Prefix => self.eq_bytes(&url[..lit.len()], lit),
            Anchor::Suffix => self.eq_bytes(&url[url.len() - lit.len()..], lit),
            Anchor::Exact => self.eq_bytes(url, lit),
            Anchor::Substring => {
                lit.is_empty() || url.windows(lit.len()).any(|w| self.eq_bytes(w, lit))
            }
        }
    }
}

/// Factory for the fast back-end's literal subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastMatcherFactory;

impl FastMatcherFactory {
    /// Create a new factory.
    pub fn new() -> Self {
        Self
    }
}

impl MatcherFactory for FastMatcherFactory {
    fn backend(&self) -> MatcherBackend {
        MatcherBackend::Fast
    }

    fn compile(&self, rule: &Rule) -> Result<Box<dyn Matcher>> {
        let matcher =
            LiteralMatcher::parse(rule.pattern()).map_err(|reason| Error::UnsupportedPattern {
                line: rule.line(),
                pattern: rule.pattern().to_string(),
                reason,
            })?;
        Ok(Box::new(matcher))
    }
}
