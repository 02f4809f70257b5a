//! RuleSet compilation and configuration.

mod config;

pub use config::{FilterConfig, LengthLimits, RuleSource};

use std::fmt;

use crate::rule::{Matcher, MatcherFactory, Rule};
use crate::{MatchDecision, MatcherBackend, Result};

/// A rule paired with the matcher compiled from its pattern.
#[derive(Debug)]
struct CompiledRule {
    rule: Rule,
    matcher: Box<dyn Matcher>,
}

/// RuleSet is the ordered, immutable collection of compiled rules.
///
/// Rules are evaluated in declaration order and the first applicable rule
/// whose pattern matches decides ("first match wins"). Nothing can be added
/// or removed after compilation, so a RuleSet can be shared freely between
/// threads.
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    backend: MatcherBackend,
}

impl RuleSet {
    /// Compile rules with a matcher factory.
    ///
    /// Each rule's ordinal becomes its position in `rules`, so a subset or a
    /// reordering of loaded rules evaluates in the order given here.
    /// Fails on the first rule whose pattern the factory rejects.
    pub fn compile(rules: Vec<Rule>, factory: &dyn MatcherFactory) -> Result<Self> {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(position, rule)| {
                let rule = rule.renumbered(position);
                let matcher = factory.compile(&rule)?;
                Ok(CompiledRule { rule, matcher })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules,
            backend: factory.backend(),
        })
    }

    /// Create an empty rule set.
    pub fn empty(backend: MatcherBackend) -> Self {
        Self {
            rules: Vec::new(),
            backend,
        }
    }

    /// Get the number of rules in this set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if this rule set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Back-end the patterns were compiled for.
    pub fn backend(&self) -> MatcherBackend {
        self.backend
    }

    /// Iterate over the rules in declaration order.
    pub fn rules(&self) -> impl ExactSizeIterator<Item = &Rule> + '_ {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Get the rule at a given ordinal.
    pub fn get(&self, ordinal: usize) -> Option<&Rule> {
        self.rules.get(ordinal).map(|c| &c.rule)
    }

    /// Scan rules in order and return the ordinal of the first applicable match.
    ///
    /// `host` is the lower-case host of `url`, used for scoped rules.
    pub fn first_match(&self, url: &str, host: &str) -> Option<usize> {
        self.rules
            .iter()
            .position(|c| c.rule.applies_to(host) && c.matcher.matches(url))
    }

    /// Evaluate a URL by linear scan.
    pub fn evaluate(&self, url: &str, host: &str) -> MatchDecision {
        match self.first_match(url, host) {
            Some(ordinal) => self.rules[ordinal].rule.decision(),
            None => MatchDecision::NoRuleMatched,
        }
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("backend", &self.backend)
            .field("len", &self.rules.len())
            .finish()
    }
}
