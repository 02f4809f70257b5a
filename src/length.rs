//! Length guard applied before rule evaluation.

use std::fmt;

use crate::parts::UrlParts;
use crate::ruleset::LengthLimits;

/// Which limit rejected a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthViolation {
    /// Whole URL too long
    Url { len: usize, max: usize },
    /// Path too long
    Path { len: usize, max: usize },
    /// Query too long
    Query { len: usize, max: usize },
}

impl fmt::Display for LengthViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthViolation::Url { len, max } => write!(f, "URL length {len} exceeds {max}"),
            LengthViolation::Path { len, max } => write!(f, "path length {len} exceeds {max}"),
            LengthViolation::Query { len, max } => write!(f, "query length {len} exceeds {max}"),
        }
    }
}

/// LengthGuard rejects oversized URLs before any pattern runs.
///
/// The URL, path and query limits are checked independently, in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthGuard {
    limits: LengthLimits,
}

impl LengthGuard {
    /// Create a guard from configured limits.
    pub fn new(limits: LengthLimits) -> Self {
        Self { limits }
    }

    /// The configured limits.
    pub fn limits(&self) -> &LengthLimits {
        &self.limits
    }

    /// Check a decomposed URL; `Err` carries the first exceeded limit.
    pub fn check(&self, parts: &UrlParts) -> Result<(), LengthViolation> {
        if let Some(max) = self.limits.max_url_length {
            if parts.full_len > max {
                return Err(LengthViolation::Url {
                    len: parts.full_len,
                    max,
                });
            }
        }
        if let Some(max) = self.limits.max_path_length {
            if parts.path_len > max {
                return Err(LengthViolation::Path {
                    len: parts.path_len,
                    max,
                });
            }
        }
        if let Some(max) = self.limits.max_query_length {
            if parts.query_len > max {
                return Err(LengthViolation::Query {
                    len: parts.query_len,
                    max,
                });
            }
        }
        Ok(())
    }
}
