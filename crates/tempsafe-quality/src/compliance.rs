//! Compliance aggregation
//!
//! Rolls a reading set into a [`ComplianceReport`] in a single pass:
//! filter by period and location, classify, group by category and
//! location, bucket for the trend, then attach recommendations.

use crate::profile::ComplianceProfile;
use crate::recommend::{Recommendation, RecommendationGenerator};
use crate::trend::{self, TrendDirection, TrendPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tempsafe_core::{LocationFilter, Period, Reading, ReadingCategory, Result};
use tempsafe_policy::{Classifier, ThresholdRegistry, Violation, ViolationDetector, ViolationSeverity};

/// Percentage of `compliant` in `total`, one decimal. An empty set is 100.
pub fn compliance_rate(compliant: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        (compliant as f64 / total as f64 * 1000.0).round() / 10.0
    }
}

/// Figures for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCompliance {
    pub total: usize,
    pub compliant: usize,
    pub violations: Vec<Violation>,
    pub compliance_rate: f64,
}

impl CategoryCompliance {
    pub fn new(total: usize, violations: Vec<Violation>) -> Self {
        let compliant = total.saturating_sub(violations.len());
        Self {
            total,
            compliant,
            compliance_rate: compliance_rate(compliant, total),
            violations,
        }
    }

    pub fn critical_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_critical()).count()
    }
}

/// Figures for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCompliance {
    pub total: usize,
    pub compliant: usize,
    pub violation_count: usize,
    pub compliance_rate: f64,
}

/// Compliance summary for a period, handed to report renderers as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub period: Period,
    pub location_filter: LocationFilter,
    pub profile: ComplianceProfile,
    pub registry_version: String,
    pub total_records: usize,
    pub compliant_count: usize,
    pub violation_count: usize,
    /// Readings in scope that failed validation and were left out of every count
    pub skipped_invalid: usize,
    pub compliance_rate: f64,
    pub by_category: BTreeMap<ReadingCategory, CategoryCompliance>,
    pub by_location: BTreeMap<String, LocationCompliance>,
    /// Most severe first, newest first within a severity
    pub violations: Vec<Violation>,
    pub trend: Vec<TrendPoint>,
    pub trend_direction: TrendDirection,
    pub recommendations: Vec<Recommendation>,
}

impl ComplianceReport {
    /// Whether the overall rate meets the profile's target
    pub fn meets_target(&self) -> bool {
        self.compliance_rate >= self.profile.overall_threshold
    }

    pub fn violations_with(&self, severity: ViolationSeverity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }

    /// One-line summary for logs and notifications
    pub fn summary(&self) -> String {
        let status = if self.meets_target() { "ON TARGET" } else { "BELOW TARGET" };
        let mut summary = format!(
            "{}: {:.1}% compliant ({} of {} readings, {} violations) for {}",
            status,
            self.compliance_rate,
            self.compliant_count,
            self.total_records,
            self.violation_count,
            self.location_filter
        );
        if self.skipped_invalid > 0 {
            summary.push_str(&format!(", {} invalid skipped", self.skipped_invalid));
        }
        summary
    }
}

#[derive(Default)]
struct Tally {
    total: usize,
    violations: usize,
}

impl Tally {
    fn record(&mut self, violated: bool) {
        self.total += 1;
        if violated {
            self.violations += 1;
        }
    }

    fn compliant(&self) -> usize {
        self.total - self.violations
    }
}

/// Aggregator bound to a registry and a profile
#[derive(Debug, Clone)]
pub struct ComplianceAggregator<'a> {
    detector: ViolationDetector<'a>,
    profile: ComplianceProfile,
}

impl ComplianceAggregator<'static> {
    /// Aggregator over the canonical registry
    pub fn new(profile: ComplianceProfile) -> Self {
        Self::with_detector(ViolationDetector::default(), profile)
    }
}

impl Default for ComplianceAggregator<'static> {
    fn default() -> Self {
        Self::new(ComplianceProfile::default())
    }
}

impl<'a> ComplianceAggregator<'a> {
    pub fn with_detector(detector: ViolationDetector<'a>, profile: ComplianceProfile) -> Self {
        Self { detector, profile }
    }

    pub fn with_registry(registry: &'a ThresholdRegistry, profile: ComplianceProfile) -> Self {
        Self::with_detector(ViolationDetector::new(Classifier::new(registry)), profile)
    }

    pub fn profile(&self) -> &ComplianceProfile {
        &self.profile
    }

    pub fn aggregate(
        &self,
        readings: &[Reading],
        period: &Period,
        location_filter: &LocationFilter,
    ) -> Result<ComplianceReport> {
        period.validate()?;

        let mut per_category: BTreeMap<ReadingCategory, (usize, Vec<Violation>)> = BTreeMap::new();
        let mut per_location: BTreeMap<String, Tally> = BTreeMap::new();
        let mut per_bucket: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
        let mut skipped_invalid = 0;

        for reading in readings {
            if !period.contains(reading.recorded_at) || !location_filter.matches(&reading.location_id) {
                continue;
            }

            let violation = match self.detector.inspect(reading) {
                Ok(v) => v,
                Err(err) => {
                    tracing::warn!(
                        category = %reading.category,
                        location = %reading.location_id,
                        recorded_at = %reading.recorded_at,
                        error = %err,
                        "skipping invalid reading"
                    );
                    skipped_invalid += 1;
                    continue;
                }
            };
            let violated = violation.is_some();

            let entry = per_category.entry(reading.category).or_default();
            entry.0 += 1;
            entry.1.extend(violation);

            per_location
                .entry(reading.location_id.clone())
                .or_default()
                .record(violated);
            per_bucket
                .entry(self.profile.trend_bucket.bucket_start(reading.recorded_at))
                .or_default()
                .record(violated);
        }

        let by_category: BTreeMap<ReadingCategory, CategoryCompliance> = per_category
            .into_iter()
            .map(|(category, (total, mut violations))| {
                sort_violations(&mut violations);
                (category, CategoryCompliance::new(total, violations))
            })
            .collect();

        let total_records: usize = by_category.values().map(|c| c.total).sum();
        let mut violations: Vec<Violation> = by_category
            .values()
            .flat_map(|c| c.violations.iter().cloned())
            .collect();
        sort_violations(&mut violations);
        let violation_count = violations.len();
        let compliant_count = total_records - violation_count;

        let by_location = per_location
            .into_iter()
            .map(|(location, tally)| {
                let figures = LocationCompliance {
                    total: tally.total,
                    compliant: tally.compliant(),
                    violation_count: tally.violations,
                    compliance_rate: compliance_rate(tally.compliant(), tally.total),
                };
                (location, figures)
            })
            .collect();

        let trend: Vec<TrendPoint> = per_bucket
            .into_iter()
            .map(|(bucket_start, tally)| TrendPoint {
                bucket_start,
                total: tally.total,
                compliant: tally.compliant(),
                compliance_rate: compliance_rate(tally.compliant(), tally.total),
            })
            .collect();
        let trend_direction = trend::direction(&trend, self.profile.trend_sensitivity);

        let mut report = ComplianceReport {
            period: *period,
            location_filter: location_filter.clone(),
            profile: self.profile.clone(),
            registry_version: self.detector.classifier().registry().version().to_string(),
            total_records,
            compliant_count,
            violation_count,
            skipped_invalid,
            compliance_rate: compliance_rate(compliant_count, total_records),
            by_category,
            by_location,
            violations,
            trend,
            trend_direction,
            recommendations: Vec::new(),
        };
        report.recommendations = RecommendationGenerator::new(self.profile.clone()).generate(&report);

        tracing::debug!(
            location = %report.location_filter,
            total = report.total_records,
            violations = report.violation_count,
            skipped = report.skipped_invalid,
            rate = report.compliance_rate,
            "aggregated compliance report"
        );

        Ok(report)
    }
}

/// Severity descending, then most recent first
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.reading.recorded_at.cmp(&a.reading.recorded_at))
    });
}

/// Aggregate against the canonical registry with the standard profile
pub fn aggregate(
    readings: &[Reading],
    period: &Period,
    location_filter: &LocationFilter,
) -> Result<ComplianceReport> {
    ComplianceAggregator::default().aggregate(readings, period, location_filter)
}
