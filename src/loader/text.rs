//! Rule text line grammar.
//!
//! ```text
//! # comment line, ignored
//! +literal-or-regex           (allow)
//! -literal-or-regex           (deny)
//! +scope-host:pattern         (allow, scoped to host/domain)
//! ```

use crate::rule::{Scope, Sign};

/// One classified line of rule text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// Blank or comment line
    Skip,
    /// A signed rule
    Rule {
        sign: Sign,
        scope: Option<Scope>,
        pattern: &'a str,
    },
    /// Neither of the above
    Invalid,
}

/// Classify one raw line.
pub(crate) fn parse_line(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Skip;
    }

    let mut chars = line.chars();
    let Some(sign) = chars.next().and_then(Sign::from_char) else {
        return Line::Invalid;
    };
    let (scope, pattern) = split_scope(chars.as_str());

    Line::Rule {
        sign,
        scope,
        pattern,
    }
}

/// Split an optional `host:` scope prefix off a rule body.
fn split_scope(body: &str) -> (Option<Scope>, &str) {
    if let Some((head, tail)) = body.split_once(':') {
        if let Some(scope) = Scope::parse(head) {
            return (Some(scope), tail);
        }
    }
    (None, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_lines() {
        assert_eq!(parse_line(""), Line::Skip);
        assert_eq!(parse_line("   \t"), Line::Skip);
        assert_eq!(parse_line("# comment"), Line::Skip);
        assert_eq!(parse_line("   # indented comment"), Line::Skip);
    }

    #[test]
    fn test_signed_rules() {
        assert_eq!(
            parse_line("  -wiki  "),
            Line::Rule {
                sign: Sign::Deny,
                scope: None,
                pattern: "wiki"
            }
        );
        assert_eq!(
            parse_line("+^https://"),
            Line::Rule {
                sign: Sign::Allow,
                scope: None,
                pattern: "^https://"
            }
        );
    }

    #[test]
    fn test_scope_prefix() {
        assert_eq!(
            parse_line("+example.org:"),
            Line::Rule {
                sign: Sign::Allow,
                scope: Scope::parse("example.org"),
                pattern: ""
            }
        );
        assert_eq!(
            parse_line("-Sub.Example.org:/private/"),
            Line::Rule {
                sign: Sign::Deny,
                scope: Scope::parse("sub.example.org"),
                pattern: "/private/"
            }
        );
    }

    #[test]
    fn test_scheme_is_not_a_scope() {
        assert_eq!(
            parse_line("-http://"),
            Line::Rule {
                sign: Sign::Deny,
                scope: None,
                pattern: "http://"
            }
        );
        assert_eq!(
            parse_line(r"-^https?://"),
            Line::Rule {
                sign: Sign::Deny,
                scope: None,
                pattern: "^https?://"
            }
        );
    }

    #[test]
    fn test_invalid_lines() {
        assert_eq!(parse_line("wiki"), Line::Invalid);
        assert_eq!(parse_line("*foo"), Line::Invalid);
    }
}
