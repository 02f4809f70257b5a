//! Multi-literal substring search for unanchored rules.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use ahash::AHashMap;

use crate::error::{Error, Result};

/// SubstringIndex finds every unanchored literal occurring in a URL in one scan.
///
/// Identical literals share one automaton pattern; each pattern maps to the
/// sorted ordinals of the rules that wrote it.
pub(crate) struct SubstringIndex {
    automaton: AhoCorasick,
    ordinals: Vec<Vec<usize>>,
    min_ordinal: usize,
    case_insensitive: bool,
}

impl SubstringIndex {
    /// Build from `(literal, ordinal)` pairs given in ascending ordinal order.
    ///
    /// Returns `None` when there are no literals.
    pub(crate) fn build(entries: &[(&str, usize)], case_insensitive: bool) -> Result<Option<Self>> {
        if entries.is_empty() {
            return Ok(None);
        }

        let mut patterns: Vec<&str> = Vec::new();
        let mut ordinals: Vec<Vec<usize>> = Vec::new();
        let mut seen: AHashMap<String, usize> = AHashMap::new();

        for &(literal, ordinal) in entries {
            let key = if case_insensitive {
                literal.to_ascii_lowercase()
            } else {
                literal.to_string()
            };
            match seen.get(&key).copied() {
                Some(id) => ordinals[id].push(ordinal),
                None => {
                    seen.insert(key, patterns.len());
                    patterns.push(literal);
                    ordinals.push(vec![ordinal]);
                }
            }
        }

        let automaton = AhoCorasickBuilder::new()
            .ascii_case_insensitive(case_insensitive)
            .build(&patterns)
            .map_err(|e| Error::Config(format!("failed to build substring automaton: {e}")))?;

        Ok(Some(Self {
            automaton,
            ordinals,
            min_ordinal: entries[0].1,
            case_insensitive,
        }))
    }

    /// Smallest ordinal this index can report.
    pub(crate) fn min_ordinal(&self) -> usize {
        self.min_ordinal
    }

    /// Whether literals compare ASCII case-insensitively.
    pub(crate) fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Hand the ordinals of every literal found in `url` to `visit`.
    ///
    /// `visit` returns `false` to stop scanning.
    pub(crate) fn scan(&self, url: &str, mut visit: impl FnMut(&[usize]) -> bool) {
        for m in self.automaton.find_overlapping_iter(url) {
            if !visit(&self.ordinals[m.pattern().as_usize()]) {
                return;
            }
        }
    }
}

impl std::fmt::Debug for SubstringIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubstringIndex")
            .field("patterns", &self.ordinals.len())
            .field("min_ordinal", &self.min_ordinal)
            .finish()
    }
}
