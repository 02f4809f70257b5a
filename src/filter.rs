//! URL filter orchestration.

use std::io::BufRead;

use crate::error::Result;
use crate::fast::FastMatcher;
use crate::length::{LengthGuard, LengthViolation};
use crate::parts::UrlParts;
use crate::rule::{FastMatcherFactory, MatcherFactory, RegexMatcherFactory, Rule};
use crate::ruleset::{FilterConfig, RuleSet};
use crate::{Decision, LogContext, MatchDecision, MatcherBackend, RuleLoader};

/// Build the matcher factory a configuration asks for.
pub fn factory_for(config: &FilterConfig) -> Box<dyn MatcherFactory> {
    match config.backend {
        MatcherBackend::Regex => Box::new(
            RegexMatcherFactory::new().dot_matches_new_line(config.dot_matches_new_line),
        ),
        MatcherBackend::Fast => Box::new(FastMatcherFactory::new()),
    }
}

/// Outcome of looking a URL up, before the default decision is applied.
enum Lookup<'a> {
    TooLong(LengthViolation),
    Matched(&'a Rule),
    NoMatch,
}

/// UrlFilter decides whether a crawler keeps or discards a URL.
///
/// Each call decomposes the URL, applies the length guard, then evaluates
/// the rules in declaration order. The filter holds no per-call state, so
/// one instance can serve any number of threads.
///
/// # Examples
/// ```
/// use crawlrule::{Decision, FilterConfig, LogContext, MatcherBackend, UrlFilter};
///
/// let config = FilterConfig::with_rules("-/errdap/wms/\n-allDatasets\n+.")
///     .backend(MatcherBackend::Regex);
/// let filter = UrlFilter::new(&config, LogContext::default()).unwrap();
///
/// assert_eq!(filter.filter("https://example.gov/errdap/wms/stuff/").unwrap(), Decision::Discard);
/// assert_eq!(filter.filter("https://example.gov/errdap/alldatasets.html/").unwrap(), Decision::Keep);
/// ```
pub struct UrlFilter {
    ruleset: RuleSet,
    fast: Option<FastMatcher>,
    guard: LengthGuard,
    default_decision: Decision,
    log: LogContext,
}

impl UrlFilter {
    /// Build a filter from a configuration, reading rules from its source.
    pub fn new(config: &FilterConfig, log: LogContext) -> Result<Self> {
        config.limits.validate()?;
        let source = config.rule_source();
        log::info!(target: log.target(), "Reading {}", source.describe());

        let factory = factory_for(config);
        let ruleset = RuleLoader::new(factory.as_ref()).load_source(&source)?;
        Self::from_ruleset(ruleset, config, log)
    }

    /// Build a filter from rule text, ignoring the configured rule source.
    pub fn from_rules<R: BufRead>(reader: R, config: &FilterConfig, log: LogContext) -> Result<Self> {
        config.limits.validate()?;
        let factory = factory_for(config);
        let ruleset = RuleLoader::new(factory.as_ref()).load(reader)?;
        Self::from_ruleset(ruleset, config, log)
    }

    /// Build a filter around an already compiled rule set.
    ///
    /// The evaluation strategy follows the rule set's back-end; `config`
    /// supplies the length limits and the default decision.
    pub fn from_ruleset(ruleset: RuleSet, config: &FilterConfig, log: LogContext) -> Result<Self> {
        config.limits.validate()?;
        let fast = match ruleset.backend() {
            MatcherBackend::Fast => Some(FastMatcher::compile(&ruleset)?),
            MatcherBackend::Regex => None,
        };

        match &fast {
            Some(fast) => {
                let sizes = fast.group_sizes();
                log::info!(
                    target: log.target(),
                    "Compiled {} fast rules ({} prefix, {} suffix, {} exact, {} substring)",
                    fast.len(),
                    sizes.prefix,
                    sizes.suffix,
                    sizes.exact,
                    sizes.substring
                );
            }
            None => {
                log::info!(target: log.target(), "Compiled {} regex rules", ruleset.len());
            }
        }

        Ok(Self {
            ruleset,
            fast,
            guard: LengthGuard::new(config.limits),
            default_decision: config.default_decision,
            log,
        })
    }

    /// The compiled rules.
    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }

    /// Back-end used for evaluation.
    pub fn backend(&self) -> MatcherBackend {
        self.ruleset.backend()
    }

    /// Decision for URLs no rule matches.
    pub fn default_decision(&self) -> Decision {
        self.default_decision
    }

    /// The length guard.
    pub fn length_guard(&self) -> &LengthGuard {
        &self.guard
    }

    /// The logging context.
    pub fn log_context(&self) -> &LogContext {
        &self.log
    }

    fn lookup(&self, url: &str) -> Result<Lookup<'_>> {
        let parts = UrlParts::parse(url)?;
        if let Err(violation) = self.guard.check(&parts) {
            return Ok(Lookup::TooLong(violation));
        }

        let ordinal = match &self.fast {
            Some(fast) => fast.first_match(url, &parts.host),
            None => self.ruleset.first_match(url, &parts.host),
        };
        Ok(match ordinal.and_then(|o| self.ruleset.get(o)) {
            Some(rule) => Lookup::Matched(rule),
            None => Lookup::NoMatch,
        })
    }

    /// Evaluate a URL to its raw tri-state result.
    ///
    /// URLs rejected by the length guard report [`MatchDecision::Denied`].
    pub fn evaluate(&self, url: &str) -> Result<MatchDecision> {
        Ok(match self.lookup(url)? {
            Lookup::TooLong(violation) => {
                log::debug!(target: self.log.target(), "Denied {}: {}", url, violation);
                MatchDecision::Denied
            }
            Lookup::Matched(rule) => rule.decision(),
            Lookup::NoMatch => MatchDecision::NoRuleMatched,
        })
    }

    /// Decide whether to keep or discard a URL.
    pub fn filter(&self, url: &str) -> Result<Decision> {
        let decision = self.evaluate(url)?.resolve(self.default_decision);
        log::trace!(target: self.log.target(), "{} {}", decision, url);
        Ok(decision)
    }

    /// Legacy convention: echo the URL when kept, `None` when discarded.
    pub fn filter_url<'u>(&self, url: &'u str) -> Result<Option<&'u str>> {
        Ok(self.filter(url)?.is_keep().then_some(url))
    }

    /// The rule that decides a URL, if any; `None` when the length guard
    /// rejects it or no rule matches.
    pub fn matched_rule(&self, url: &str) -> Result<Option<&Rule>> {
        Ok(match self.lookup(url)? {
            Lookup::Matched(rule) => Some(rule),
            Lookup::TooLong(_) | Lookup::NoMatch => None,
        })
    }
}

impl std::fmt::Debug for UrlFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlFilter")
            .field("backend", &self.backend())
            .field("rules", &self.ruleset.len())
            .field("guard", &self.guard)
            .field("default_decision", &self.default_decision)
            .field("log_target", &self.log.target())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::LengthLimits;
    use crate::Error;

    fn filter(rules: &str, backend: MatcherBackend) -> UrlFilter {
        let config = FilterConfig::with_rules(rules).backend(backend);
        UrlFilter::new(&config, LogContext::default()).unwrap()
    }

    const BACKENDS: [MatcherBackend; 2] = [MatcherBackend::Regex, MatcherBackend::Fast];

    #[test]
    fn test_suffix_rule() {
        for backend in BACKENDS {
            let f = filter("-\\.rss$\n+^http", backend);
            assert_eq!(f.filter("http://a.com/data.rss").unwrap(), Decision::Discard);
            assert_eq!(f.filter("http://a.com/datarss").unwrap(), Decision::Keep);
            assert_eq!(f.filter("http://a.com/data.rss/baz").unwrap(), Decision::Keep);
            assert_eq!(f.filter("http://a.com/test_rss_feed").unwrap(), Decision::Keep);
        }
    }

    #[test]
    fn test_default_decision() {
        for backend in BACKENDS {
            let deny = filter("", backend);
            assert_eq!(deny.default_decision(), Decision::Discard);
            assert_eq!(
                deny.evaluate("http://a.com/").unwrap(),
                MatchDecision::NoRuleMatched
            );
            assert_eq!(deny.filter("http://a.com/").unwrap(), Decision::Discard);

            let config = FilterConfig::default()
                .backend(backend)
                .default_decision(Decision::Keep);
            let allow = UrlFilter::new(&config, LogContext::default()).unwrap();
            assert!(allow.ruleset().is_empty());
            assert_eq!(allow.filter("http://a.com/").unwrap(), Decision::Keep);
        }
    }

    #[test]
    fn test_filter_url_echo() {
        let f = filter("-wiki\n+.", MatcherBackend::Regex);
        let kept = "https://example.gov/baz.xml";
        assert_eq!(f.filter_url(kept).unwrap(), Some(kept));
        assert_eq!(
            f.filter_url("https://en.wikipedia.org/wiki/Apache_Nutch").unwrap(),
            None
        );
    }

    #[test]
    fn test_malformed_url_is_error() {
        let f = filter("+.", MatcherBackend::Fast);
        assert!(matches!(f.filter("::nope"), Err(Error::MalformedUrl { .. })));
        // The filter keeps working after a bad URL.
        assert_eq!(f.filter("http://a.com/").unwrap(), Decision::Keep);
    }

    #[test]
    fn test_length_guard_runs_before_rules() {
        let limits = LengthLimits {
            max_url_length: Some(100),
            max_path_length: Some(50),
            max_query_length: Some(50),
        };
        for backend in BACKENDS {
            let config = FilterConfig::with_rules("+^http")
                .backend(backend)
                .limits(limits);
            let f = UrlFilter::new(&config, LogContext::new("test")).unwrap();

            let long_path = format!("http://nutch.apache.org/{}", "0123456789".repeat(6));
            assert_eq!(f.evaluate(&long_path).unwrap(), MatchDecision::Denied);
            assert!(f.matched_rule(&long_path).unwrap().is_none());

            let long_query = format!("http://nutch.apache.org/path?{}", "q".repeat(51));
            assert_eq!(f.filter(&long_query).unwrap(), Decision::Discard);

            let long_url = format!("http://nutch.apache.org/{}?{}", "p".repeat(40), "q".repeat(40));
            assert_eq!(f.filter(&long_url).unwrap(), Decision::Discard);

            assert_eq!(f.filter("http://nutch.apache.org/").unwrap(), Decision::Keep);
        }
    }

    #[test]
    fn test_matched_rule() {
        let f = filter("-/private/\n+example.org:\n-.", MatcherBackend::Regex);
        let rule = f.matched_rule("http://www.example.org/x").unwrap().unwrap();
        assert_eq!(rule.ordinal(), 1);
        assert_eq!(rule.to_string(), "+example.org:");
        assert!(f.matched_rule("mailto:x@example.org").unwrap().is_some());
    }

    #[test]
    fn test_construction_errors_propagate() {
        let config = FilterConfig::with_rules("-a.b").backend(MatcherBackend::Fast);
        assert!(matches!(
            UrlFilter::new(&config, LogContext::default()),
            Err(Error::UnsupportedPattern { .. })
        ));

        let config = FilterConfig::with_rules("oops").backend(MatcherBackend::Regex);
        assert!(matches!(
            UrlFilter::new(&config, LogContext::default()),
            Err(Error::RuleSyntax { line: 1, .. })
        ));

        let config = FilterConfig {
            rules_file: Some("/nonexistent/crawlrule/rules.txt".into()),
            ..FilterConfig::default()
        };
        assert!(matches!(
            UrlFilter::new(&config, LogContext::default()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_from_ruleset_with_reordered_rules() {
        for backend in [MatcherBackend::Regex, MatcherBackend::Fast] {
            let config = FilterConfig::default().backend(backend);
            let factory = factory_for(&config);

            let mut rules = RuleLoader::parse("+b\n-b".as_bytes()).unwrap();
            rules.reverse();
            let ruleset = RuleSet::compile(rules, factory.as_ref()).unwrap();
            let f = UrlFilter::from_ruleset(ruleset, &config, LogContext::default()).unwrap();
            assert_eq!(f.evaluate("http://x.com/b").unwrap(), MatchDecision::Denied);

            let mut rules = RuleLoader::parse("-a\n-b".as_bytes()).unwrap();
            let ruleset = RuleSet::compile(rules.split_off(1), factory.as_ref()).unwrap();
            let f = UrlFilter::from_ruleset(ruleset, &config, LogContext::default()).unwrap();
            assert_eq!(f.evaluate("http://x.com/b").unwrap(), MatchDecision::Denied);
            assert_eq!(f.matched_rule("http://x.com/b").unwrap().unwrap().line(), 2);
            assert_eq!(
                f.evaluate("http://x.com/a").unwrap(),
                MatchDecision::NoRuleMatched
            );
        }
    }

    #[test]
    fn test_from_rules_reader() {
        let config = FilterConfig::default().backend(MatcherBackend::Fast);
        let f = UrlFilter::from_rules("-wiki\n+".as_bytes(), &config, LogContext::default())
            .unwrap();
        assert_eq!(f.backend(), MatcherBackend::Fast);
        assert_eq!(f.filter("https://example.gov/baz.xml").unwrap(), Decision::Keep);
    }
}
