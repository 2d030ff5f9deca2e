//! Remediation recommendations derived from a compliance report

use crate::compliance::ComplianceReport;
use crate::profile::ComplianceProfile;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use tempsafe_core::ReadingCategory;

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Medium = 0,
    High = 1,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// An actionable follow-up for a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// `None` for the system-level recommendation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ReadingCategory>,
    pub description: String,
    pub action: String,
    pub priority: Priority,
}

impl Recommendation {
    pub fn is_system_level(&self) -> bool {
        self.category.is_none()
    }
}

/// Corrective action for repeated failures in a category
pub fn remediation_for(category: ReadingCategory) -> &'static str {
    match category {
        ReadingCategory::FoodHot => {
            "Check hot-holding equipment; reheat food to 75°C or discard anything held below 63°C for over 2 hours"
        }
        ReadingCategory::FoodCold => {
            "Check cold display units and limit the time food spends out of refrigeration"
        }
        ReadingCategory::Fridge => {
            "Service fridge units: check door seals, thermostat settings and avoid overloading"
        }
        ReadingCategory::Freezer => {
            "Inspect freezer seals and defrost cycles; move stock if the unit cannot hold -18°C"
        }
        ReadingCategory::Delivery => {
            "Review supplier transport conditions and reject deliveries outside safe limits"
        }
        ReadingCategory::CoolingCurve => {
            "Review cooling procedures: portion food, use ice baths or a blast chiller"
        }
        ReadingCategory::ProbeCalibrationIce | ReadingCategory::ProbeCalibrationBoiling => {
            "Recalibrate or replace probe thermometers before further use"
        }
    }
}

/// Rule set turning category figures into recommendations
#[derive(Debug, Clone, Default)]
pub struct RecommendationGenerator {
    profile: ComplianceProfile,
}

impl RecommendationGenerator {
    pub fn new(profile: ComplianceProfile) -> Self {
        Self { profile }
    }

    /// At most one recommendation per category, ordered by priority then
    /// by the category's violation count.
    pub fn generate(&self, report: &ComplianceReport) -> Vec<Recommendation> {
        // (recommendation, violation count used for ordering); `by_category`
        // is keyed by category, so each category is visited once
        let mut ranked: Vec<(Recommendation, usize)> = Vec::new();

        for (category, figures) in &report.by_category {
            let below_target = figures.compliance_rate < self.profile.category_threshold;
            let critical = figures.critical_count();
            if !below_target && critical == 0 {
                continue;
            }

            let priority = if critical > 0 { Priority::High } else { Priority::Medium };
            let description = if below_target {
                format!(
                    "{} compliance is {:.1}% against a target of {:.1}% ({} of {} readings out of range)",
                    category.display_name(),
                    figures.compliance_rate,
                    self.profile.category_threshold,
                    figures.violations.len(),
                    figures.total
                )
            } else {
                format!(
                    "{} logged {} critical reading(s) despite {:.1}% compliance",
                    category.display_name(),
                    critical,
                    figures.compliance_rate
                )
            };

            let candidate = Recommendation {
                category: Some(*category),
                description,
                action: remediation_for(*category).to_string(),
                priority,
            };

            ranked.push((candidate, figures.violations.len()));
        }

        if report.compliance_rate < self.profile.overall_threshold {
            ranked.push((
                Recommendation {
                    category: None,
                    description: format!(
                        "Overall compliance is {:.1}% against a target of {:.1}%",
                        report.compliance_rate, self.profile.overall_threshold
                    ),
                    action: "Review staff training on temperature checks and confirm logging procedures are followed at every location".to_string(),
                    priority: Priority::High,
                },
                report.violation_count,
            ));
        }

        ranked.sort_by_key(|(rec, count)| (Reverse(rec.priority), Reverse(*count), rec.category));
        ranked.into_iter().map(|(rec, _)| rec).collect()
    }
}

/// Generate recommendations using the thresholds the report was built with
pub fn generate_recommendations(report: &ComplianceReport) -> Vec<Recommendation> {
    RecommendationGenerator::new(report.profile.clone()).generate(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::CategoryCompliance;
    use crate::trend::TrendDirection;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use tempsafe_core::{LocationFilter, Period, Reading};
    use tempsafe_policy::{inspect, Violation};

    fn violation(category: ReadingCategory, value: f64) -> Violation {
        let at = Utc.with_ymd_and_hms(2024, 7, 3, 9, 0, 0).unwrap();
        inspect(&Reading::new(category, value, at, "cafe", "ash"))
            .unwrap()
            .unwrap()
    }

    fn figures(total: usize, violations: Vec<Violation>) -> CategoryCompliance {
        CategoryCompliance::new(total, violations)
    }

    fn report(by_category: Vec<(ReadingCategory, CategoryCompliance)>) -> ComplianceReport {
        let total: usize = by_category.iter().map(|(_, f)| f.total).sum();
        let violations: usize = by_category.iter().map(|(_, f)| f.violations.len()).sum();
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        ComplianceReport {
            period: Period { start: at, end: at },
            location_filter: LocationFilter::All,
            profile: ComplianceProfile::standard(),
            registry_version: "test".to_string(),
            total_records: total,
            compliant_count: total - violations,
            violation_count: violations,
            skipped_invalid: 0,
            compliance_rate: crate::compliance::compliance_rate(total - violations, total),
            by_category: by_category.into_iter().collect(),
            by_location: BTreeMap::new(),
            violations: vec![],
            trend: vec![],
            trend_direction: TrendDirection::Stable,
            recommendations: vec![],
        }
    }

    #[test]
    fn test_low_category_without_critical_is_medium() {
        let r = report(vec![(
            ReadingCategory::Fridge,
            figures(4, vec![violation(ReadingCategory::Fridge, 9.0)]),
        )]);
        let recs = generate_recommendations(&r);

        let fridge = recs.iter().find(|r| r.category == Some(ReadingCategory::Fridge)).unwrap();
        assert_eq!(fridge.priority, Priority::Medium);
        assert!(fridge.description.contains("75.0%"));
    }

    #[test]
    fn test_critical_escalates_to_high() {
        let r = report(vec![(
            ReadingCategory::FoodHot,
            figures(2, vec![violation(ReadingCategory::FoodHot, 55.0)]),
        )]);
        let recs = generate_recommendations(&r);
        assert_eq!(recs[0].priority, Priority::High);
    }

    #[test]
    fn test_critical_above_target_still_recommended() {
        let one_critical = vec![violation(ReadingCategory::FoodCold, 12.0)];
        let r = report(vec![(ReadingCategory::FoodCold, figures(20, one_critical))]);
        let recs = generate_recommendations(&r);

        let cold = recs.iter().find(|r| r.category == Some(ReadingCategory::FoodCold)).unwrap();
        assert_eq!(cold.priority, Priority::High);
        assert!(cold.description.contains("critical"));
    }

    #[test]
    fn test_system_level_only_below_overall_target() {
        let healthy = report(vec![(ReadingCategory::Freezer, figures(100, vec![]))]);
        assert!(generate_recommendations(&healthy).is_empty());

        let minor = vec![
            violation(ReadingCategory::Freezer, -17.0),
            violation(ReadingCategory::Freezer, -16.0),
        ];
        let slipping = report(vec![(ReadingCategory::Freezer, figures(20, minor))]);
        let recs = generate_recommendations(&slipping);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].is_system_level());
        assert_eq!(recs[0].priority, Priority::High);
    }

    #[test]
    fn test_category_exactly_at_threshold_is_not_recommended() {
        // 17 of 20 in range: exactly 85.0%
        let minor = vec![
            violation(ReadingCategory::Fridge, 6.0),
            violation(ReadingCategory::Fridge, 7.0),
            violation(ReadingCategory::Fridge, -1.0),
        ];
        let r = report(vec![(ReadingCategory::Fridge, figures(20, minor))]);
        assert_eq!(r.by_category[&ReadingCategory::Fridge].compliance_rate, 85.0);

        let recs = generate_recommendations(&r);
        assert!(recs.iter().all(|rec| rec.category.is_none()));
    }

    #[test]
    fn test_overall_exactly_at_threshold_has_no_system_level() {
        // 19 of 20 in range: exactly 95.0%
        let one_minor = vec![violation(ReadingCategory::Freezer, -16.5)];
        let r = report(vec![(ReadingCategory::Freezer, figures(20, one_minor))]);
        assert_eq!(r.compliance_rate, 95.0);
        assert!(generate_recommendations(&r).is_empty());
    }

    #[test]
    fn test_one_recommendation_per_category() {
        let r = report(vec![
            (
                ReadingCategory::FoodCold,
                figures(
                    2,
                    vec![
                        violation(ReadingCategory::FoodCold, 12.0),
                        violation(ReadingCategory::FoodCold, 6.0),
                    ],
                ),
            ),
            (
                ReadingCategory::FoodHot,
                figures(1, vec![violation(ReadingCategory::FoodHot, 50.0)]),
            ),
        ]);
        let recs = generate_recommendations(&r);
        let mut categories: Vec<_> = recs.iter().map(|rec| rec.category).collect();
        let before = categories.len();
        categories.sort();
        categories.dedup();
        assert_eq!(categories.len(), before);
    }

    #[test]
    fn test_ordering_by_priority_then_violation_count() {
        let r = report(vec![
            (
                ReadingCategory::Fridge,
                figures(
                    3,
                    vec![
                        violation(ReadingCategory::Fridge, 9.0),
                        violation(ReadingCategory::Fridge, 10.0),
                    ],
                ),
            ),
            (
                ReadingCategory::Freezer,
                figures(2, vec![violation(ReadingCategory::Freezer, -10.0)]),
            ),
            (
                ReadingCategory::FoodHot,
                figures(2, vec![violation(ReadingCategory::FoodHot, 40.0)]),
            ),
        ]);
        let recs = generate_recommendations(&r);

        // High first: system-level (4 violations) then FoodHot; then medium by count
        assert!(recs[0].is_system_level());
        assert_eq!(recs[1].category, Some(ReadingCategory::FoodHot));
        assert_eq!(recs[2].category, Some(ReadingCategory::Fridge));
        assert_eq!(recs[3].category, Some(ReadingCategory::Freezer));
    }

    #[test]
    fn test_serialization() {
        let rec = Recommendation {
            category: Some(ReadingCategory::Delivery),
            description: "d".to_string(),
            action: remediation_for(ReadingCategory::Delivery).to_string(),
            priority: Priority::High,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["priority"], "high");
        assert_eq!(json["category"], "Delivery");
    }
}
