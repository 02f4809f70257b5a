//! Throughput harness for rule-set scaling.
//!
//! The harness builds filters from the first `n` rules of a rule corpus and
//! times them against a URL corpus. It drives the public filter API only and
//! is meant for benchmarks and regression tests, not for the crawl path.

use serde::Serialize;
use std::hint::black_box;
use std::io::BufRead;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::ruleset::FilterConfig;
use crate::{Decision, LogContext, MatcherBackend, UrlFilter};

/// Rule counts swept by default.
pub const DEFAULT_RULE_COUNTS: [usize; 5] = [50, 100, 200, 400, 800];

/// Log target of filters built by the harness.
const BENCH_LOG_TARGET: &str = "crawlrule::bench";

/// Result of one harness run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    pub backend: MatcherBackend,
    pub rule_count: usize,
    pub url_count: usize,
    pub rounds: usize,
    pub kept: usize,
    pub discarded: usize,
    pub errors: usize,
    /// Total time over all rounds
    pub elapsed_nanos: u64,
    /// Per-URL cost of the fastest round
    pub nanos_per_url: f64,
}

/// BenchmarkHarness drives [`UrlFilter`]s over a fixed URL corpus.
///
/// # Example
/// ```
/// use crawlrule::{BenchmarkHarness, FilterConfig, MatcherBackend};
///
/// let harness = BenchmarkHarness::new(
///     vec!["-\\.rss$".to_string(), "+^https://".to_string()],
///     vec!["https://example.com/feed.rss".to_string(), "https://example.com/".to_string()],
/// )
/// .config(FilterConfig::default().backend(MatcherBackend::Fast));
///
/// let report = harness.run(2).unwrap();
/// assert_eq!(report.kept, 1);
/// assert_eq!(report.discarded, 1);
/// ```
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    rules: Vec<String>,
    urls: Vec<String>,
    config: FilterConfig,
    rounds: usize,
}

impl BenchmarkHarness {
    /// Create a harness from rule lines and URLs.
    pub fn new(rules: Vec<String>, urls: Vec<String>) -> Self {
        Self {
            rules,
            urls,
            config: FilterConfig::default(),
            rounds: 3,
        }
    }

    /// Read a rule corpus and a URL corpus, one entry per line.
    ///
    /// Blank lines and `#` comments are skipped in both.
    pub fn from_readers<R: BufRead, U: BufRead>(rules: R, urls: U) -> Result<Self> {
        Ok(Self::new(read_entries(rules)?, read_entries(urls)?))
    }

    /// Set the base configuration (back-end, limits, default decision).
    ///
    /// Any rule source in the configuration is ignored.
    pub fn config(mut self, config: FilterConfig) -> Self {
        self.config = FilterConfig {
            rules: None,
            rules_file: None,
            ..config
        };
        self
    }

    /// Set the number of timed rounds per run.
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds.max(1);
        self
    }

    /// Number of URLs in the corpus.
    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// Rule text made of the first `count` corpus rules, cycling when the
    /// corpus is shorter.
    pub fn rule_text(&self, count: usize) -> String {
        if self.rules.is_empty() {
            return String::new();
        }
        self.rules
            .iter()
            .cycle()
            .take(count)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build a filter with `count` rules.
    pub fn build(&self, count: usize) -> Result<UrlFilter> {
        let text = self.rule_text(count);
        UrlFilter::from_rules(text.as_bytes(), &self.config, LogContext::new(BENCH_LOG_TARGET))
    }

    /// Time the filter with `count` rules over the URL corpus.
    pub fn run(&self, count: usize) -> Result<BenchReport> {
        let filter = self.build(count)?;

        let (mut kept, mut discarded, mut errors) = (0, 0, 0);
        for url in &self.urls {
            match filter.filter(url) {
                Ok(Decision::Keep) => kept += 1,
                Ok(Decision::Discard) => discarded += 1,
                Err(_) => errors += 1,
            }
        }

        let mut total = Duration::ZERO;
        let mut fastest = Duration::MAX;
        for _ in 0..self.rounds {
            let start = Instant::now();
            for url in &self.urls {
                let _ = black_box(filter.filter(black_box(url)));
            }
            let elapsed = start.elapsed();
            total += elapsed;
            fastest = fastest.min(elapsed);
        }

        let report = BenchReport {
            backend: filter.backend(),
            rule_count: filter.ruleset().len(),
            url_count: self.urls.len(),
            rounds: self.rounds,
            kept,
            discarded,
            errors,
            elapsed_nanos: total.as_nanos() as u64,
            nanos_per_url: fastest.as_nanos() as f64 / self.urls.len().max(1) as f64,
        };
        log::debug!(
            target: BENCH_LOG_TARGET,
            "{} rules on {}: {:.1} ns/url",
            report.rule_count,
            report.backend,
            report.nanos_per_url
        );
        Ok(report)
    }

    /// Run once per rule count.
    pub fn sweep(&self, counts: &[usize]) -> Result<Vec<BenchReport>> {
        counts.iter().map(|&count| self.run(count)).collect()
    }
}

fn read_entries<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        entries.push(line.to_string());
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness() -> BenchmarkHarness {
        BenchmarkHarness::from_readers(
            "# rules\n-wiki\n\n+^https://\n".as_bytes(),
            "https://en.wikipedia.org/wiki/X\nhttps://example.gov/\nhttp://a.com/\nnot a url\n".as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_rule_text_cycles() {
        let h = harness();
        assert_eq!(h.rule_text(0), "");
        assert_eq!(h.rule_text(1), "-wiki");
        assert_eq!(h.rule_text(3), "-wiki\n+^https://\n-wiki");
    }

    #[test]
    fn test_run_counts_decisions() {
        for backend in [MatcherBackend::Regex, MatcherBackend::Fast] {
            let h = harness()
                .config(FilterConfig::default().backend(backend))
                .rounds(1);
            let report = h.run(2).unwrap();
            assert_eq!(report.backend, backend);
            assert_eq!(report.rule_count, 2);
            assert_eq!(report.url_count, 4);
            assert_eq!(report.kept, 1);
            assert_eq!(report.discarded, 2);
            assert_eq!(report.errors, 1);
            assert!(report.nanos_per_url >= 0.0);
        }
    }

    #[test]
    fn test_config_drops_rule_source() {
        let h = harness().config(FilterConfig::with_rules("-everything"));
        assert!(h.config.rules.is_none());
        assert_eq!(h.build(1).unwrap().ruleset().len(), 1);
    }

    #[test]
    fn test_sweep() {
        let reports = harness().rounds(1).sweep(&[1, 2, 4]).unwrap();
        let counts: Vec<usize> = reports.iter().map(|r| r.rule_count).collect();
        assert_eq!(counts, vec![1, 2, 4]);
    }

    #[test]
    fn test_report_serializes() {
        let report = harness().rounds(1).run(1).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["backend"], "regex");
        assert_eq!(json["rule_count"], 1);
    }
}
