//! Session Store Metrics
//!
//! Prometheus counters for failures the request path recovers from (loads)
//! and the ones it reports (saves).

use prometheus::{IntCounterVec, Opts, Registry};

/// Failure counters labelled by `backend` and `reason`
#[derive(Debug, Clone)]
pub struct SessionMetrics {
    load_failures: IntCounterVec,
    save_failures: IntCounterVec,
}

impl SessionMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let load_failures = IntCounterVec::new(
            Opts::new(
                "auth_session_load_failures_total",
                "Session loads that fell back to a fresh session",
            ),
            &["backend", "reason"],
        )?;
        let save_failures = IntCounterVec::new(
            Opts::new(
                "auth_session_save_failures_total",
                "Session saves that returned an error",
            ),
            &["backend", "reason"],
        )?;

        Ok(Self {
            load_failures,
            save_failures,
        })
    }

    /// Expose the counters through `registry`
    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.load_failures.clone()))?;
        registry.register(Box::new(self.save_failures.clone()))?;
        Ok(())
    }

    pub fn record_load_failure(&self, backend: &str, reason: &str) {
        self.load_failures.with_label_values(&[backend, reason]).inc();
    }

    pub fn record_save_failure(&self, backend: &str, reason: &str) {
        self.save_failures.with_label_values(&[backend, reason]).inc();
    }

    pub fn load_failures(&self, backend: &str, reason: &str) -> u64 {
        self.load_failures.with_label_values(&[backend, reason]).get()
    }

    pub fn save_failures(&self, backend: &str, reason: &str) -> u64 {
        self.save_failures.with_label_values(&[backend, reason]).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_labelled() {
        let metrics = SessionMetrics::new().unwrap();
        metrics.record_load_failure("redis", "timeout");
        metrics.record_load_failure("redis", "timeout");
        metrics.record_save_failure("cookie", "token_too_large");

        assert_eq!(metrics.load_failures("redis", "timeout"), 2);
        assert_eq!(metrics.load_failures("cookie", "timeout"), 0);
        assert_eq!(metrics.save_failures("cookie", "token_too_large"), 1);
    }

    #[test]
    fn test_register_exposes_families() {
        let registry = Registry::new();
        let metrics = SessionMetrics::new().unwrap();
        metrics.register(&registry).unwrap();
        metrics.record_load_failure("memory", "malformed");

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.name().to_string())
            .collect();
        assert!(names.contains(&"auth_session_load_failures_total".to_string()));

        // Same names cannot be registered twice
        assert!(metrics.register(&registry).is_err());
    }
}
