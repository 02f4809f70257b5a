//! Property tests: the fast back-end decides exactly like the regex back-end
//! and like a rule-by-rule scan, for any rule set in the literal subset.

use crawlrule::fast::FastMatcher;
use crawlrule::rule::{FastMatcherFactory, RegexMatcherFactory};
use crawlrule::{FilterConfig, LogContext, MatcherBackend, RuleLoader, UrlFilter};
use proptest::prelude::*;

const HOSTS: [&str; 3] = ["example.org", "a.example.org", "other.net"];

/// One rule of the literal subset, rendered as a rule line.
fn arb_rule_line() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        prop_oneof![
            3 => Just(None),
            1 => Just(Some("example.org")),
            1 => Just(Some("a.example.org")),
        ],
        any::<bool>(),
        0..4u8,
        "[abAB/.]{0,3}",
    )
        .prop_map(|(allow, scope, ci, anchor, literal)| {
            let mut line = String::new();
            line.push(if allow { '+' } else { '-' });
            if let Some(scope) = scope {
                line.push_str(scope);
                line.push(':');
            }
            if ci {
                line.push_str("(?i)");
            }
            if anchor == 1 || anchor == 3 {
                line.push('^');
            }
            line.push_str(&literal.replace('.', "\\."));
            if anchor == 2 || anchor == 3 {
                line.push('$');
            }
            line
        })
}

fn arb_rules() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_rule_line(), 0..24).prop_map(|lines| lines.join("\n"))
}

fn arb_url() -> impl Strategy<Value = (String, &'static str)> {
    (0..HOSTS.len(), "[abAB/.]{0,8}")
        .prop_map(|(h, path)| (format!("http://{}/{}", HOSTS[h], path), HOSTS[h]))
}

fn build(rules: &str, backend: MatcherBackend) -> UrlFilter {
    let config = FilterConfig::with_rules(rules).backend(backend);
    UrlFilter::new(&config, LogContext::new("crawlrule::proptest")).unwrap()
}

proptest! {
    /// Fast and regex filters reach the same tri-state decision.
    #[test]
    fn fast_equals_regex(rules in arb_rules(), urls in prop::collection::vec(arb_url(), 1..16)) {
        let regex = build(&rules, MatcherBackend::Regex);
        let fast = build(&rules, MatcherBackend::Fast);

        for (url, _) in &urls {
            prop_assert_eq!(
                fast.evaluate(url).unwrap(),
                regex.evaluate(url).unwrap(),
                "rules:\n{}\nurl: {}", rules, url
            );
        }
    }

    /// The combined structures pick the same ordinal as a linear scan.
    #[test]
    fn combined_equals_linear_scan(rules in arb_rules(), (url, host) in arb_url()) {
        let regex_factory = RegexMatcherFactory::new();
        let regex_rules = RuleLoader::new(&regex_factory).load_str(&rules).unwrap();

        let fast_factory = FastMatcherFactory::new();
        let literal_rules = RuleLoader::new(&fast_factory).load_str(&rules).unwrap();
        let combined = FastMatcher::compile(&literal_rules).unwrap();

        let expected = regex_rules.first_match(&url, host);
        prop_assert_eq!(literal_rules.first_match(&url, host), expected);
        prop_assert_eq!(combined.first_match(&url, host), expected);
    }

    /// Repeated evaluation never changes the decision.
    #[test]
    fn evaluation_is_deterministic(rules in arb_rules(), (url, _) in arb_url()) {
        let fast = build(&rules, MatcherBackend::Fast);
        let first = fast.filter(&url).unwrap();
        for _ in 0..4 {
            prop_assert_eq!(fast.filter(&url).unwrap(), first);
        }
    }
}
