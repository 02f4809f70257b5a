//! Crawlrule - A high-throughput rule-based URL filter for web crawlers.
//!
//! A crawler asks the filter, for every candidate URL, whether to keep or
//! discard it. The answer comes from an operator-supplied, ordered list of
//! allow/deny rules where the first matching rule wins.
//!
//! # Features
//!
//! - **Two back-ends**: general regular expressions, or a restricted literal
//!   subset evaluated through combined tries and an Aho-Corasick automaton
//! - **Identical decisions**: both back-ends follow first-match-wins in
//!   declaration order
//! - **Host scoping**: rules can be limited to a host and its subdomains
//! - **Length guard**: oversized URLs, paths or queries are rejected before
//!   any rule runs
//! - **Thread-safe**: compiled filters are immutable; [`SharedUrlFilter`]
//!   swaps in new rules atomically
//!
//! # Quick Start
//!
//! ```
//! use crawlrule::{Decision, FilterConfig, LogContext, MatcherBackend, UrlFilter};
//!
//! let config = FilterConfig::with_rules("-\\.rss$\n-wiki\n+^https://")
//!     .backend(MatcherBackend::Fast);
//! let filter = UrlFilter::new(&config, LogContext::default()).unwrap();
//!
//! assert_eq!(filter.filter("https://example.com/feed.rss").unwrap(), Decision::Discard);
//! assert_eq!(filter.filter("https://example.com/data").unwrap(), Decision::Keep);
//! // No rule matches: the default decision (discard) applies.
//! assert_eq!(filter.filter("http://example.com/data").unwrap(), Decision::Discard);
//! ```
//!
//! # Rule Format
//!
//! ```text
//! # comment line, ignored
//! +pattern                (allow)
//! -pattern                (deny)
//! +host.example:pattern   (allow, only for host.example and its subdomains)
//! ```
//!
//! The fast back-end accepts `literal`, `^literal`, `literal$` and
//! `^literal$`, with regex metacharacters escaped and an optional leading
//! `(?i)` for ASCII case-insensitive comparison.

mod backend;
mod decision;
mod error;
mod filter;
mod length;
mod loader;
mod logging;
mod parts;
mod shared;

pub mod fast;
pub mod harness;
pub mod rule;
pub mod ruleset;

// Re-export core types
pub use backend::MatcherBackend;
pub use decision::{Decision, MatchDecision};
pub use error::{Error, Result};
pub use logging::{LogContext, DEFAULT_LOG_TARGET};

// Re-export rule loading and compiled sets
pub use loader::RuleLoader;
pub use ruleset::{FilterConfig, LengthLimits, RuleSet, RuleSource};

// Re-export filter types
pub use filter::{factory_for, UrlFilter};
pub use length::{LengthGuard, LengthViolation};
pub use parts::UrlParts;
pub use shared::SharedUrlFilter;

// Re-export benchmark harness
pub use harness::{BenchReport, BenchmarkHarness};
