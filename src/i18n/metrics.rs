//! Resolution metrics and observability.
//!
//! Tracks how often localized strings resolve through the langpath versus
//! falling back to their default tag, and how often collections re-sort.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Counters for localized-string resolution.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    /// Resolutions answered by a tag on the langpath
    langpath_hits: AtomicUsize,

    /// Resolutions that fell back to the instance's default tag
    default_fallbacks: AtomicUsize,

    /// Full re-sorts performed by ordered sets
    resorts: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<ResolutionMetrics> = OnceLock::new();

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the global resolution metrics instance.
    pub fn global() -> &'static ResolutionMetrics {
        METRICS.get_or_init(ResolutionMetrics::new)
    }

    pub fn record_langpath_hit(&self) {
        self.langpath_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_default_fallback(&self) {
        self.default_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resort(&self) {
        self.resorts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn langpath_hits(&self) -> usize {
        self.langpath_hits.load(Ordering::Relaxed)
    }

    pub fn default_fallbacks(&self) -> usize {
        self.default_fallbacks.load(Ordering::Relaxed)
    }

    pub fn resorts(&self) -> usize {
        self.resorts.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.langpath_hits();
        let fallbacks = self.default_fallbacks();
        let resolutions = hits + fallbacks;
        let fallback_rate = if resolutions > 0 {
            (fallbacks as f64 / resolutions as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            resolutions,
            langpath_hits: hits,
            default_fallbacks: fallbacks,
            fallback_rate,
            resorts: self.resorts(),
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.langpath_hits.store(0, Ordering::Relaxed);
        self.default_fallbacks.store(0, Ordering::Relaxed);
        self.resorts.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of resolution statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Total resolutions recorded
    pub resolutions: usize,

    pub langpath_hits: usize,

    pub default_fallbacks: usize,

    /// Share of resolutions that used the default tag, as a percentage (0-100)
    pub fallback_rate: f64,

    pub resorts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = ResolutionMetrics::new();
        let report = metrics.report();
        assert_eq!(report.resolutions, 0);
        assert_eq!(report.resorts, 0);
        assert_eq!(report.fallback_rate, 0.0);
    }

    #[test]
    fn test_fallback_rate() {
        let metrics = ResolutionMetrics::new();
        metrics.record_langpath_hit();
        metrics.record_langpath_hit();
        metrics.record_langpath_hit();
        metrics.record_default_fallback();

        let report = metrics.report();
        assert_eq!(report.resolutions, 4);
        assert_eq!(report.langpath_hits, 3);
        assert_eq!(report.default_fallbacks, 1);
        assert!((report.fallback_rate - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_resort() {
        let metrics = ResolutionMetrics::new();
        metrics.record_resort();
        metrics.record_resort();
        assert_eq!(metrics.resorts(), 2);
    }

    #[test]
    fn test_reset() {
        let metrics = ResolutionMetrics::new();
        metrics.record_langpath_hit();
        metrics.record_resort();
        metrics.reset();
        assert_eq!(metrics.langpath_hits(), 0);
        assert_eq!(metrics.resorts(), 0);
    }

    #[test]
    fn test_report_serialization() {
        let metrics = ResolutionMetrics::new();
        metrics.record_default_fallback();
        let json = serde_json::to_string(&metrics.report()).expect("Should serialize");
        assert!(json.contains("\"default_fallbacks\":1"));
        assert!(json.contains("\"fallback_rate\":100.0"));
    }

    #[test]
    fn test_global_returns_singleton() {
        assert!(std::ptr::eq(
            ResolutionMetrics::global(),
            ResolutionMetrics::global()
        ));
    }
}
