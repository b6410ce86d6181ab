//! Prometheus counters served on `/metrics`.
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    reports: IntCounterVec,
    recalls: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let reports = IntCounterVec::new(
            Opts::new("dropstat_reports_total", "Reports stored, by reliability"),
            &["reliable"],
        )?;
        let recalls = IntCounterVec::new(
            Opts::new("dropstat_recalls_total", "Recall attempts, by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(reports.clone()))?;
        registry.register(Box::new(recalls.clone()))?;
        Ok(Self {
            registry,
            reports,
            recalls,
        })
    }

    pub fn record_report(&self, reliable: bool) {
        let label = if reliable { "true" } else { "false" };
        self.reports.with_label_values(&[label]).inc();
    }

    /// `outcome` is "ok" or an error code
    pub fn record_recall(&self, outcome: &str) {
        self.recalls.with_label_values(&[outcome]).inc();
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_encoded() {
        let metrics = Metrics::new().unwrap();
        metrics.record_report(true);
        metrics.record_report(false);
        metrics.record_report(false);
        metrics.record_recall("EXPIRED");

        let text = metrics.encode().unwrap();
        assert!(text.contains("dropstat_reports_total{reliable=\"false\"} 2"));
        assert!(text.contains("dropstat_reports_total{reliable=\"true\"} 1"));
        assert!(text.contains("dropstat_recalls_total{outcome=\"EXPIRED\"} 1"));
    }
}
