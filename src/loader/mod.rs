//! Rule text loading.

mod text;

use std::io::BufRead;

use self::text::{parse_line, Line};
use crate::error::{Error, Result};
use crate::rule::{MatcherFactory, Rule};
use crate::ruleset::{RuleSet, RuleSource};

/// RuleLoader turns rule text into a compiled [`RuleSet`].
///
/// The loader reads every line, keeps one rule per non-blank, non-comment
/// line in source order, and compiles each pattern with the injected
/// [`MatcherFactory`]. It reports problems only through its return value.
///
/// # Examples
/// ```
/// use crawlrule::RuleLoader;
/// use crawlrule::rule::FastMatcherFactory;
///
/// let factory = FastMatcherFactory::new();
/// let ruleset = RuleLoader::new(&factory)
///     .load_str("# feeds\n-\\.rss$\n+^https://")
///     .unwrap();
/// assert_eq!(ruleset.len(), 2);
/// ```
pub struct RuleLoader<'a> {
    factory: &'a dyn MatcherFactory,
}

impl<'a> RuleLoader<'a> {
    /// Create a loader that compiles with `factory`.
    pub fn new(factory: &'a dyn MatcherFactory) -> Self {
        Self { factory }
    }

    /// Parse rule text into uncompiled rules.
    pub fn parse<R: BufRead>(reader: R) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;

            match parse_line(&line) {
                Line::Skip => {}
                Line::Rule {
                    sign,
                    scope,
                    pattern,
                } => {
                    let ordinal = rules.len();
                    rules.push(Rule::new(sign, pattern, scope, ordinal, number));
                }
                Line::Invalid => {
                    return Err(Error::RuleSyntax {
                        line: number,
                        text: line,
                    });
                }
            }
        }

        Ok(rules)
    }

    /// Parse and compile rule text from a reader.
    pub fn load<R: BufRead>(&self, reader: R) -> Result<RuleSet> {
        let rules = Self::parse(reader)?;
        RuleSet::compile(rules, self.factory)
    }

    /// Parse and compile rule text held in a string.
    pub fn load_str(&self, text: &str) -> Result<RuleSet> {
        self.load(text.as_bytes())
    }

    /// Parse and compile a configured source; no source gives an empty set.
    pub fn load_source(&self, source: &RuleSource) -> Result<RuleSet> {
        match source.open()? {
            Some(reader) => self.load(reader),
            None => Ok(RuleSet::empty(self.factory.backend())),
        }
    }
}
