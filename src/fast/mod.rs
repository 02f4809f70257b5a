//! Combined matching engine for the fast back-end.
//!
//! Rules are split by anchor class into groups that can each be searched
//! for all of their literals at once:
//! - prefix and exact rules: a forward byte trie
//! - suffix rules: a backward byte trie
//! - unanchored rules: an Aho-Corasick automaton
//!
//! Case-sensitive and `(?i)` rules live in separate structures. Every hit
//! carries the ordinal of its rule, and the lowest applicable ordinal across
//! all groups wins, which is exactly what a rule-by-rule scan would pick.

mod substring;
mod trie;

use std::fmt;

use self::substring::SubstringIndex;
use self::trie::{ByteTrie, Direction};
use crate::error::{Error, Result};
use crate::rule::{fold_ascii_outliers, Anchor, LiteralMatcher, Scope};
use crate::ruleset::RuleSet;

/// Number of rules per anchor class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupSizes {
    pub prefix: usize,
    pub suffix: usize,
    pub exact: usize,
    pub substring: usize,
}

/// Anchored literals of one case mode.
#[derive(Debug)]
struct AnchoredGroup {
    forward: ByteTrie,
    backward: ByteTrie,
}

impl AnchoredGroup {
    fn new(case_insensitive: bool) -> Self {
        Self {
            forward: ByteTrie::new(Direction::Forward, case_insensitive),
            backward: ByteTrie::new(Direction::Backward, case_insensitive),
        }
    }
}

/// Running minimum over matched ordinals, honoring rule scopes.
struct Best<'a> {
    scopes: &'a [Option<Scope>],
    host: &'a str,
    ordinal: Option<usize>,
}

impl Best<'_> {
    /// Consider a sorted list of matched ordinals; returns `false` once
    /// nothing lower than the current best can follow.
    fn offer(&mut self, ordinals: &[usize]) -> bool {
        for &ordinal in ordinals {
            if self.ordinal.map_or(false, |best| ordinal >= best) {
                break;
            }
            if self.scopes[ordinal]
                .as_ref()
                .map_or(true, |scope| scope.contains_host(self.host))
            {
                self.ordinal = Some(ordinal);
                break;
            }
        }
        self.ordinal != Some(0)
    }

    fn beats(&self, ordinal: usize) -> bool {
        self.ordinal.map_or(false, |best| best <= ordinal)
    }
}

/// FastMatcher evaluates all rules of a literal-subset [`RuleSet`] in one
/// pass per anchor group.
///
/// # Examples
/// ```
/// use crawlrule::fast::FastMatcher;
/// use crawlrule::rule::FastMatcherFactory;
/// use crawlrule::RuleLoader;
///
/// let factory = FastMatcherFactory::new();
/// let ruleset = RuleLoader::new(&factory)
///     .load_str("-\\.rss$\n-wiki\n+^https://")
///     .unwrap();
/// let fast = FastMatcher::compile(&ruleset).unwrap();
///
/// assert_eq!(fast.first_match("https://example.com/feed.rss", "example.com"), Some(0));
/// assert_eq!(fast.first_match("https://example.com/", "example.com"), Some(2));
/// assert_eq!(fast.first_match("http://example.com/", "example.com"), None);
/// ```
pub struct FastMatcher {
    scopes: Vec<Option<Scope>>,
    sensitive: AnchoredGroup,
    insensitive: AnchoredGroup,
    substrings: Vec<SubstringIndex>,
    sizes: GroupSizes,
}

impl FastMatcher {
    /// Build the combined structures for every rule of `ruleset`.
    ///
    /// Fails with [`Error::UnsupportedPattern`] if a pattern is outside the
    /// literal subset.
    pub fn compile(ruleset: &RuleSet) -> Result<Self> {
        let mut scopes = Vec::with_capacity(ruleset.len());
        let mut sensitive = AnchoredGroup::new(false);
        let mut insensitive = AnchoredGroup::new(true);
        let mut sizes = GroupSizes::default();
        let mut parsed = Vec::with_capacity(ruleset.len());

        // Hits are keyed by position in the rule set, the same numbering
        // `RuleSet::get` and the linear scan use.
        for (position, rule) in ruleset.rules().enumerate() {
            let literal =
                LiteralMatcher::parse(rule.pattern()).map_err(|reason| Error::UnsupportedPattern {
                    line: rule.line(),
                    pattern: rule.pattern().to_string(),
                    reason,
                })?;
            scopes.push(rule.scope().cloned());
            parsed.push((position, literal));
        }

        let mut unanchored: [Vec<(&str, usize)>; 2] = [Vec::new(), Vec::new()];
        for (ordinal, literal) in &parsed {
            let ordinal = *ordinal;
            let ci = literal.is_case_insensitive();
            let group = if ci { &mut insensitive } else { &mut sensitive };
            let bytes = literal.literal().as_bytes();

            match literal.anchor() {
                Anchor::Prefix => {
                    group.forward.insert(bytes, ordinal, false);
                    sizes.prefix += 1;
                }
                Anchor::Exact => {
                    group.forward.insert(bytes, ordinal, true);
                    sizes.exact += 1;
                }
                Anchor::Suffix => {
                    group.backward.insert(bytes, ordinal, false);
                    sizes.suffix += 1;
                }
                // The empty literal occurs in every URL, same as the empty prefix.
                Anchor::Substring if bytes.is_empty() => {
                    group.forward.insert(bytes, ordinal, false);
                    sizes.substring += 1;
                }
                Anchor::Substring => {
                    unanchored[ci as usize].push((literal.literal(), ordinal));
                    sizes.substring += 1;
                }
            }
        }

        let mut substrings = Vec::new();
        for (ci, entries) in unanchored.iter().enumerate() {
            if let Some(index) = SubstringIndex::build(entries, ci == 1)? {
                substrings.push(index);
            }
        }
        substrings.sort_by_key(|index| index.min_ordinal());

        Ok(Self {
            scopes,
            sensitive,
            insensitive,
            substrings,
            sizes,
        })
    }

    /// Number of rules indexed.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Check if no rules are indexed.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Rule counts per anchor class.
    pub fn group_sizes(&self) -> GroupSizes {
        self.sizes
    }

    /// Return the ordinal of the lowest rule that applies to `host` and matches `url`.
    pub fn first_match(&self, url: &str, host: &str) -> Option<usize> {
        let mut best = Best {
            scopes: &self.scopes,
            host,
            ordinal: None,
        };
        let folded = fold_ascii_outliers(url);

        for (group, input) in [(&self.sensitive, url), (&self.insensitive, &*folded)] {
            let bytes = input.as_bytes();
            if !group.forward.is_empty() {
                group.forward.walk(bytes, |ords| best.offer(ords));
            }
            if !group.backward.is_empty() {
                group.backward.walk(bytes, |ords| best.offer(ords));
            }
        }

        for index in &self.substrings {
            if best.beats(index.min_ordinal()) {
                break;
            }
            let input = if index.is_case_insensitive() {
                &*folded
            } else {
                url
            };
            index.scan(input, |ords| best.offer(ords));
        }

        best.ordinal
    }
}

impl fmt::Debug for FastMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastMatcher")
            .field("rules", &self.scopes.len())
            .field("groups", &self.sizes)
            .finish()
    }
}
