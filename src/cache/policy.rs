// src/cache/policy.rs
use std::time::Duration;

use crate::types::JobQuery;
use crate::utils::normalize_key_part;

pub const DEFAULT_MIN_LIMIT: usize = 1;
pub const DEFAULT_MAX_LIMIT: usize = 100;
pub const DEFAULT_LIMIT: usize = 50;

/// Bounds applied to the number of listings a caller may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_LIMIT,
            max: DEFAULT_MAX_LIMIT,
            default: DEFAULT_LIMIT,
        }
    }
}

impl LimitPolicy {
    pub fn new(min: usize, max: usize, default: usize) -> Self {
        let min = min.max(1);
        let max = max.max(min);
        Self {
            min,
            max,
            default: default.clamp(min, max),
        }
    }

    /// Clamp a requested limit; never rejects
    pub fn resolve(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.default,
            Some(n) if n < self.min as i64 => self.min,
            Some(n) if n > self.max as i64 => self.max,
            Some(n) => n as usize,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub limits: LimitPolicy,
}

impl CacheSettings {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            limits: LimitPolicy::default(),
        }
    }

    pub fn with_limits(mut self, limits: LimitPolicy) -> Self {
        self.limits = limits;
        self
    }
}

/// Cache key for a query: lower-cased, whitespace-collapsed parts with
/// "all"/"any" standing in for empty inputs.
pub fn cache_key(query: &JobQuery) -> String {
    format!(
        "{}::{}",
        normalize_key_part(&query.role, "all"),
        normalize_key_part(&query.location, "any")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_clamps() {
        let limits = LimitPolicy::default();
        assert_eq!(limits.resolve(None), 50);
        assert_eq!(limits.resolve(Some(500)), 100);
        assert_eq!(limits.resolve(Some(0)), 1);
        assert_eq!(limits.resolve(Some(-20)), 1);
        assert_eq!(limits.resolve(Some(37)), 37);
        assert_eq!(limits.resolve(Some(i64::MAX)), 100);
    }

    #[test]
    fn test_new_keeps_bounds_consistent() {
        let limits = LimitPolicy::new(0, 0, 500);
        assert_eq!(limits, LimitPolicy { min: 1, max: 1, default: 1 });

        let limits = LimitPolicy::new(5, 20, 2);
        assert_eq!(limits.default, 5);
    }

    #[test]
    fn test_cache_key_normalization() {
        let a = cache_key(&JobQuery::new(Some("Developer"), Some("Mumbai")));
        let b = cache_key(&JobQuery::new(Some("developer"), Some("mumbai")));
        let c = cache_key(&JobQuery::new(Some("  DEVELOPER "), Some("MUMBAI  ")));
        assert_eq!(a, "developer::mumbai");
        assert_eq!(a, b);
        assert_eq!(a, c);

        assert_eq!(cache_key(&JobQuery::new(None, None)), "developer::any");
        assert_eq!(
            cache_key(&JobQuery {
                role: String::new(),
                location: String::new()
            }),
            "all::any"
        );
    }
}
