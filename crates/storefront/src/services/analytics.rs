//! Analytics event fan-out.
//!
//! Events are delivered to every registered [`AnalyticsSink`]. A failing sink
//! is logged and skipped; it never prevents delivery to the others and never
//! fails the request that produced the event.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// A sink rejected an event.
#[derive(Debug, Error)]
#[error("analytics sink {sink} failed: {message}")]
pub struct SinkError {
    pub sink: &'static str,
    pub message: String,
}

/// Destination for analytics events.
pub trait AnalyticsSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Record one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink could not accept the event.
    fn record(&self, event: &str, data: &Value) -> Result<(), SinkError>;
}

/// Registered sinks, cheaply cloneable.
#[derive(Clone, Default)]
pub struct Analytics {
    sinks: Arc<[Arc<dyn AnalyticsSink>]>,
}

impl std::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.sinks.iter().map(|s| s.name()))
            .finish()
    }
}

impl Analytics {
    /// Create a dispatcher over the given sinks.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn AnalyticsSink>>) -> Self {
        Self {
            sinks: sinks.into(),
        }
    }

    /// Structured log plus Sentry breadcrumbs.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(vec![Arc::new(TracingSink), Arc::new(SentryBreadcrumbSink)])
    }

    /// Deliver an event to every sink. Returns how many sinks accepted it.
    pub fn record(&self, event: &str, data: &Value) -> usize {
        let mut delivered = 0;
        for sink in self.sinks.iter() {
            match sink.record(event, data) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(sink = sink.name(), event, error = %e, "Analytics sink failed"),
            }
        }
        delivered
    }
}

/// Writes events to the tracing log.
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn record(&self, event: &str, data: &Value) -> Result<(), SinkError> {
        tracing::info!(event, data = %data, "analytics event");
        Ok(())
    }
}

/// Adds events as Sentry breadcrumbs so they show up in error reports.
pub struct SentryBreadcrumbSink;

impl AnalyticsSink for SentryBreadcrumbSink {
    fn name(&self) -> &'static str {
        "sentry"
    }

    fn record(&self, event: &str, data: &Value) -> Result<(), SinkError> {
        let Value::Object(fields) = data else {
            return Err(SinkError {
                sink: self.name(),
                message: "event data must be a JSON object".to_string(),
            });
        };

        let values: Vec<(String, String)> = fields
            .iter()
            .map(|(k, v)| {
                let value = v.as_str().map_or_else(|| v.to_string(), str::to_string);
                (k.clone(), value)
            })
            .collect();
        let pairs: Vec<(&str, &str)> = values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        crate::error::add_breadcrumb("analytics", event, Some(&pairs));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl AnalyticsSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn record(&self, event: &str, _data: &Value) -> Result<(), SinkError> {
            self.events.lock().unwrap().push(event.to_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl AnalyticsSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn record(&self, _event: &str, _data: &Value) -> Result<(), SinkError> {
            Err(SinkError {
                sink: "failing",
                message: "offline".to_string(),
            })
        }
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let recording = Arc::new(RecordingSink::default());
        let analytics = Analytics::new(vec![Arc::new(FailingSink), recording.clone()]);

        let delivered = analytics.record("wishlist_synced", &json!({ "added": 1 }));

        assert_eq!(delivered, 1);
        assert_eq!(*recording.events.lock().unwrap(), vec!["wishlist_synced"]);
    }

    #[test]
    fn test_no_sinks_is_noop() {
        assert_eq!(Analytics::default().record("x", &json!({})), 0);
    }

    #[test]
    fn test_breadcrumb_sink_requires_object() {
        assert!(SentryBreadcrumbSink.record("x", &json!([1, 2])).is_err());
        assert!(SentryBreadcrumbSink.record("x", &json!({ "a": 1 })).is_ok());
    }
}
