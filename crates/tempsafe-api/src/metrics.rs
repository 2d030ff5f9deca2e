//! Prometheus counters exposed at `/metrics`.
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tempsafe_policy::Verdict;
use tempsafe_quality::ComplianceReport;

#[derive(Clone)]
pub struct ApiMetrics {
    registry: Registry,
    classified: IntCounterVec,
    reports: IntCounter,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let classified = IntCounterVec::new(
            Opts::new("tempsafe_readings_classified_total", "Readings classified, by verdict"),
            &["verdict"],
        )?;
        let reports = IntCounter::new("tempsafe_reports_generated_total", "Compliance reports generated")?;
        registry.register(Box::new(classified.clone()))?;
        registry.register(Box::new(reports.clone()))?;
        Ok(Self { registry, classified, reports })
    }

    pub fn record_verdict(&self, verdict: Verdict) {
        self.classified.with_label_values(&[verdict.as_str()]).inc();
    }

    /// Count the report and every reading it classified
    pub fn record_report(&self, report: &ComplianceReport) {
        self.reports.inc();
        self.classified
            .with_label_values(&[Verdict::Safe.as_str()])
            .inc_by(report.compliant_count as u64);
        for violation in &report.violations {
            self.record_verdict(violation.verdict);
        }
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
    fn test_encode_counts() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.record_verdict(Verdict::Danger);
        metrics.record_verdict(Verdict::Danger);

        let text = metrics.encode().unwrap();
        assert!(text.contains("tempsafe_readings_classified_total{verdict=\"DANGER\"} 2"));
        assert!(text.contains("tempsafe_reports_generated_total 0"));
    }
}
