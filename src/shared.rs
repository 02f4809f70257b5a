//! Shared filter handle with atomic reconfiguration.
//!
//! Worker threads read the current filter lock-free; a reconfiguration
//! builds a complete new filter first and then swaps it in, so readers see
//! either the old rules or the new ones, never a mix.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::error::Result;
use crate::ruleset::FilterConfig;
use crate::{Decision, LogContext, UrlFilter};

/// SharedUrlFilter publishes one [`UrlFilter`] to many threads.
///
/// # Example
/// ```
/// use crawlrule::{Decision, FilterConfig, LogContext, SharedUrlFilter};
///
/// let shared = SharedUrlFilter::from_config(&FilterConfig::with_rules("+."), LogContext::default()).unwrap();
/// assert_eq!(shared.filter("http://a.com/").unwrap(), Decision::Keep);
///
/// shared.reload(&FilterConfig::with_rules("-."), LogContext::default()).unwrap();
/// assert_eq!(shared.filter("http://a.com/").unwrap(), Decision::Discard);
/// ```
pub struct SharedUrlFilter {
    inner: ArcSwap<UrlFilter>,
}

impl SharedUrlFilter {
    /// Wrap an existing filter.
    pub fn new(filter: UrlFilter) -> Self {
        Self {
            inner: ArcSwap::from_pointee(filter),
        }
    }

    /// Build the initial filter from a configuration.
    pub fn from_config(config: &FilterConfig, log: LogContext) -> Result<Self> {
        Ok(Self::new(UrlFilter::new(config, log)?))
    }

    /// Get the current filter; the returned handle stays valid across swaps.
    pub fn load(&self) -> Arc<UrlFilter> {
        self.inner.load_full()
    }

    /// Filter a URL with the current filter.
    pub fn filter(&self, url: &str) -> Result<Decision> {
        self.inner.load().filter(url)
    }

    /// Swap in a new filter, returning the previous one.
    pub fn replace(&self, filter: UrlFilter) -> Arc<UrlFilter> {
        self.inner.swap(Arc::new(filter))
    }

    /// Build a filter from `config` and swap it in.
    ///
    /// On error the current filter stays in place.
    pub fn reload(&self, config: &FilterConfig, log: LogContext) -> Result<()> {
        let filter = UrlFilter::new(config, log)?;
        let target = filter.log_context().target().to_string();
        let rules = filter.ruleset().len();
        self.inner.store(Arc::new(filter));
        log::info!(target: target.as_str(), "Reloaded URL filter with {} rules", rules);
        Ok(())
    }
}

impl From<UrlFilter> for SharedUrlFilter {
    fn from(filter: UrlFilter) -> Self {
        Self::new(filter)
    }
}
